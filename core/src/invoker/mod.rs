mod io_pump;
mod process;
mod runtime;
mod traits;
pub mod types;

pub use process::ProcessWorkerLauncher;
pub use runtime::{Invoker, TIMEOUT_MESSAGE};
pub use traits::{WorkerLauncher, WorkerSession};
pub use types::{InvocationOutcome, WorkerExit, WorkerStartArgs};
