//! Invocation runtime: one worker process per call, both output channels
//! drained concurrently, exit bounded by a wall-clock budget.

use std::time::{Duration, Instant};

use tokio::sync::Semaphore;

use crate::config::WorkerConfig;
use crate::error::InvokerError;
use crate::util::RingBytes;

use super::io_pump;
use super::process::ProcessWorkerLauncher;
use super::traits::{WorkerLauncher, WorkerSession};
use super::types::{InvocationOutcome, WorkerStartArgs};

/// Failure message for invocations that exceed the wall-clock budget.
pub const TIMEOUT_MESSAGE: &str = "timeout";

/// Owns the worker configuration and launches one session per call.
///
/// Stateless across calls: no retries, no pooling, no shared session state.
pub struct Invoker {
    cfg: WorkerConfig,
    launcher: Box<dyn WorkerLauncher>,
    limiter: Option<Semaphore>,
}

impl Invoker {
    pub fn new(cfg: WorkerConfig) -> Self {
        Self::with_launcher(cfg, Box::new(ProcessWorkerLauncher::new()))
    }

    pub fn with_launcher(cfg: WorkerConfig, launcher: Box<dyn WorkerLauncher>) -> Self {
        let limiter = (cfg.max_concurrent > 0).then(|| Semaphore::new(cfg.max_concurrent));
        Self {
            cfg,
            launcher,
            limiter,
        }
    }

    /// Run one worker invocation with the two input fields.
    ///
    /// The fields are appended to the configured argv as two discrete
    /// trailing slots; they are data, never program text. Every failure mode
    /// collapses into `Failure` and nothing is retried.
    pub async fn invoke(&self, field_a: &str, field_b: &str) -> InvocationOutcome {
        let _permit = match &self.limiter {
            Some(sem) => match sem.acquire().await {
                Ok(permit) => Some(permit),
                Err(_) => {
                    return InvocationOutcome::Failure {
                        message: "invoker is shut down".to_string(),
                    }
                }
            },
            None => None,
        };

        let run_id = uuid::Uuid::new_v4().to_string();
        let mut args = self.cfg.args.clone();
        args.push(field_a.to_string());
        args.push(field_b.to_string());
        let start_args = WorkerStartArgs {
            cmd: self.cfg.program.clone(),
            args,
            envs: self.cfg.env.clone(),
        };

        tracing::debug!(
            target: "weaver.invoker",
            run_id = %run_id,
            program = %start_args.cmd,
            "starting worker"
        );

        let mut session = match self.launcher.start_session(&start_args).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(
                    target: "weaver.invoker",
                    run_id = %run_id,
                    error = %e,
                    "worker spawn failed"
                );
                return InvocationOutcome::Failure {
                    message: format!("spawn failed: {e}"),
                };
            }
        };

        match run_worker(session.as_mut(), &self.cfg, &run_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    target: "weaver.invoker",
                    run_id = %run_id,
                    error = %e,
                    "invocation failed"
                );
                InvocationOutcome::Failure {
                    message: e.to_string(),
                }
            }
        }
    }
}

async fn run_worker(
    session: &mut dyn WorkerSession,
    cfg: &WorkerConfig,
    run_id: &str,
) -> Result<InvocationOutcome, InvokerError> {
    let stdout = session
        .stdout()
        .ok_or_else(|| InvokerError::Spawn("no stdout".into()))?;
    let stderr = session
        .stderr()
        .ok_or_else(|| InvokerError::Spawn("no stderr".into()))?;

    let ring_out = RingBytes::new(cfg.capture_bytes);
    let ring_err = RingBytes::new(cfg.capture_bytes);

    let started_at = Instant::now();

    // Both channels get their own pump so a full pipe buffer on one can
    // never stall the other.
    let mut out_task = io_pump::pump_stdout(stdout, ring_out.clone());
    let mut err_task = io_pump::pump_stderr(stderr, ring_err.clone());

    let deadline = tokio::time::sleep(Duration::from_millis(cfg.timeout_ms));
    tokio::pin!(deadline);

    // The wait future is scoped so the session borrow is released before a
    // possible kill.
    let exited = {
        let wait_fut = session.wait();
        tokio::pin!(wait_fut);
        tokio::select! {
            res = &mut wait_fut => Some(res),
            _ = &mut deadline => None,
        }
    };

    let exit = match exited {
        None => {
            let _ = session.kill().await;
            // The pipes close once the worker is gone, but a stray
            // descendant can still hold them open; bound the final drain.
            let grace = Duration::from_millis(cfg.kill_grace_ms);
            let _ = tokio::time::timeout(grace, async {
                let _ = (&mut out_task).await;
                let _ = (&mut err_task).await;
            })
            .await;
            out_task.abort();
            err_task.abort();
            tracing::warn!(
                target: "weaver.invoker",
                run_id = %run_id,
                timeout_ms = cfg.timeout_ms,
                "worker killed after timeout"
            );
            return Ok(InvocationOutcome::Failure {
                message: TIMEOUT_MESSAGE.to_string(),
            });
        }
        Some(Err(e)) => {
            out_task.abort();
            err_task.abort();
            return Err(InvokerError::Spawn(e.to_string()));
        }
        Some(Ok(exit)) => exit,
    };

    // Exit observed; both channels must reach EOF before the outcome is
    // judged. Still bounded by the same deadline.
    let drained = tokio::select! {
        _ = async {
            let _ = (&mut out_task).await;
            let _ = (&mut err_task).await;
        } => true,
        _ = &mut deadline => false,
    };
    if !drained {
        let _ = session.kill().await;
        out_task.abort();
        err_task.abort();
        return Ok(InvocationOutcome::Failure {
            message: TIMEOUT_MESSAGE.to_string(),
        });
    }

    let duration_ms = started_at.elapsed().as_millis() as u64;

    let stderr_text = ring_err.to_string_lossy();
    if !stderr_text.is_empty() {
        // Any error-channel content decides the outcome, whatever the exit
        // code or stdout said.
        tracing::debug!(
            target: "weaver.invoker",
            run_id = %run_id,
            exit_code = exit.exit_code,
            duration_ms = duration_ms,
            "worker reported error"
        );
        return Ok(InvocationOutcome::Failure {
            message: stderr_text,
        });
    }

    tracing::debug!(
        target: "weaver.invoker",
        run_id = %run_id,
        exit_code = exit.exit_code,
        duration_ms = duration_ms,
        "worker completed"
    );
    Ok(InvocationOutcome::Success {
        output: ring_out.to_string_lossy().trim().to_string(),
    })
}
