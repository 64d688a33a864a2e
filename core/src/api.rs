//! Stable re-exports for consumers (`cli` and external crates).
//!
//! Prefer importing from `weaver_core::api` instead of reaching into internal modules.

pub use crate::config::{
    get_weaver_data_dir, load_default, AppConfig, HttpServerConfig, LoggingConfig, StoreConfig,
    WorkerConfig,
};
pub use crate::error::{CliError, InvokerError};
pub use crate::invoker::{
    InvocationOutcome, Invoker, ProcessWorkerLauncher, WorkerExit, WorkerLauncher, WorkerSession,
    WorkerStartArgs, TIMEOUT_MESSAGE,
};
pub use crate::store::{ChunkRow, ChunkStore, NewChunk, SqliteChunkStore};
