//! One-shot worker invocation from the command line.

use weaver_core::api::{AppConfig, CliError, InvocationOutcome, Invoker};

use super::cli::InvokeArgs;

/// Prints the worker output on success; the failure message goes to stderr
/// with a nonzero exit, mirroring the HTTP handler's 200/500 split.
pub async fn handle_invoke(args: InvokeArgs, cfg: AppConfig) -> Result<i32, CliError> {
    let invoker = Invoker::new(cfg.worker);
    match invoker.invoke(&args.field_a, &args.field_b).await {
        InvocationOutcome::Success { output } => {
            println!("{output}");
            Ok(0)
        }
        InvocationOutcome::Failure { message } => {
            eprintln!("{message}");
            Ok(1)
        }
    }
}
