use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::types::{WorkerExit, WorkerStartArgs};

/// One spawned worker process. Owned by a single invocation; never reused.
#[async_trait]
pub trait WorkerSession: Send {
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>>;
    fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>>;
    async fn kill(&mut self) -> anyhow::Result<()>;
    async fn wait(&mut self) -> anyhow::Result<WorkerExit>;
}

/// Seam for starting worker sessions; the production impl spawns a real
/// process, tests substitute scripted sessions.
#[async_trait]
pub trait WorkerLauncher: Send + Sync {
    fn name(&self) -> &str;
    async fn start_session(&self, args: &WorkerStartArgs)
        -> anyhow::Result<Box<dyn WorkerSession>>;
}
