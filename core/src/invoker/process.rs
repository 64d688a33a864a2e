use std::process::Stdio;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::AsyncRead;
use tokio::process::{Child, Command};

use super::traits::{WorkerLauncher, WorkerSession};
use super::types::{WorkerExit, WorkerStartArgs};

/// Spawns the worker as a real child process.
///
/// stdin is closed from the start: the worker receives its input entirely
/// through argv slots and must not wait for interactive input.
pub struct ProcessWorkerLauncher {}

impl ProcessWorkerLauncher {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for ProcessWorkerLauncher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkerLauncher for ProcessWorkerLauncher {
    fn name(&self) -> &str {
        "process"
    }

    async fn start_session(
        &self,
        args: &WorkerStartArgs,
    ) -> Result<Box<dyn WorkerSession>> {
        // kill_on_drop: if the invoking future is dropped (caller went away),
        // the runtime reaps the child instead of leaving it orphaned.
        let child = Command::new(&args.cmd)
            .args(&args.args)
            .envs(&args.envs)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        Ok(Box::new(ProcessWorkerSession { child }))
    }
}

struct ProcessWorkerSession {
    child: Child,
}

#[async_trait]
impl WorkerSession for ProcessWorkerSession {
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.child
            .stdout
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
    }

    fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.child
            .stderr
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
    }

    async fn kill(&mut self) -> Result<()> {
        let _ = self.child.kill().await;
        Ok(())
    }

    async fn wait(&mut self) -> Result<WorkerExit> {
        let status = self.child.wait().await?;
        Ok(WorkerExit {
            exit_code: normalize_exit(status),
        })
    }
}

fn normalize_exit(status: std::process::ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(code) = status.code() {
            code
        } else if let Some(sig) = status.signal() {
            128 + sig
        } else {
            1
        }
    }
    #[cfg(windows)]
    {
        status.code().unwrap_or(1)
    }
}
