//! Invocation tests against real child processes.
#![cfg(unix)]

use std::collections::HashMap;
use std::time::{Duration, Instant};

use weaver_core::api::{InvocationOutcome, Invoker, WorkerConfig, TIMEOUT_MESSAGE};

fn cfg(program: &str, args: &[&str]) -> WorkerConfig {
    WorkerConfig {
        program: program.to_string(),
        args: args.iter().map(|s| s.to_string()).collect(),
        env: HashMap::new(),
        timeout_ms: 5_000,
        kill_grace_ms: 1_000,
        capture_bytes: 1_048_576,
        max_concurrent: 0,
    }
}

fn sh(script: &str) -> WorkerConfig {
    cfg("/bin/sh", &["-c", script, "worker"])
}

#[tokio::test]
async fn echo_worker_joins_fields() {
    let invoker = Invoker::new(cfg("/bin/echo", &[]));
    let outcome = invoker.invoke("hello", "world").await;
    assert_eq!(
        outcome,
        InvocationOutcome::Success {
            output: "hello world".to_string()
        }
    );
}

#[tokio::test]
async fn fields_arrive_as_positional_parameters() {
    let invoker = Invoker::new(sh(r#"printf '%s %s\n' "$1" "$2""#));
    let outcome = invoker.invoke("hello", "world").await;
    assert_eq!(
        outcome,
        InvocationOutcome::Success {
            output: "hello world".to_string()
        }
    );
}

#[tokio::test]
async fn empty_fields_are_valid_input() {
    let invoker = Invoker::new(sh(r#"printf '%s %s\n' "$1" "$2""#));
    let outcome = invoker.invoke("", "").await;
    assert_eq!(
        outcome,
        InvocationOutcome::Success {
            output: String::new()
        }
    );
}

#[tokio::test]
async fn shell_metacharacters_in_fields_stay_inert() {
    let invoker = Invoker::new(cfg("/bin/echo", &[]));
    let hostile = r#""; echo pwned >&2; ""#;
    match invoker.invoke("hello", hostile).await {
        InvocationOutcome::Success { output } => {
            assert_eq!(output, format!("hello {hostile}"));
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn stderr_output_becomes_failure() {
    let invoker = Invoker::new(sh("echo boom >&2"));
    let outcome = invoker.invoke("a", "b").await;
    assert_eq!(
        outcome,
        InvocationOutcome::Failure {
            message: "boom\n".to_string()
        }
    );
}

#[tokio::test]
async fn stderr_wins_even_on_clean_exit_with_stdout() {
    let invoker = Invoker::new(sh("echo out; echo warn >&2; exit 0"));
    let outcome = invoker.invoke("a", "b").await;
    assert_eq!(
        outcome,
        InvocationOutcome::Failure {
            message: "warn\n".to_string()
        }
    );
}

#[tokio::test]
async fn nonzero_exit_with_quiet_stderr_is_success() {
    let invoker = Invoker::new(sh("echo fine; exit 3"));
    let outcome = invoker.invoke("a", "b").await;
    assert_eq!(
        outcome,
        InvocationOutcome::Success {
            output: "fine".to_string()
        }
    );
}

#[tokio::test]
async fn missing_program_is_launch_failure() {
    let invoker = Invoker::new(cfg("/nonexistent/weaver-worker-binary", &[]));
    match invoker.invoke("a", "b").await {
        InvocationOutcome::Failure { message } => {
            assert!(message.starts_with("spawn failed"), "got: {message}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn sleeping_worker_is_killed_on_timeout() {
    let mut cfg = sh("sleep 5");
    cfg.timeout_ms = 200;
    let invoker = Invoker::new(cfg);

    let started = Instant::now();
    let outcome = invoker.invoke("a", "b").await;
    assert_eq!(
        outcome,
        InvocationOutcome::Failure {
            message: TIMEOUT_MESSAGE.to_string()
        }
    );
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "timeout took {:?}",
        started.elapsed()
    );
}

// ~1 MiB of stdout, far past the OS pipe buffer: a serial drain of
// stdout-then-stderr (or the reverse) would stall the worker forever.
const BIG_OUTPUT_SCRIPT: &str = r#"i=0
while [ "$i" -lt 4096 ]; do
  printf '%0256d\n' 0
  i=$((i+1))
done
echo boom >&2"#;

#[tokio::test]
async fn large_stdout_with_stderr_does_not_deadlock() {
    let mut cfg = sh(BIG_OUTPUT_SCRIPT);
    cfg.timeout_ms = 30_000;
    let invoker = Invoker::new(cfg);

    let outcome = invoker.invoke("a", "b").await;
    assert_eq!(
        outcome,
        InvocationOutcome::Failure {
            message: "boom\n".to_string()
        }
    );
}
