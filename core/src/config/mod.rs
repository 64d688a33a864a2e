mod load;
mod types;

pub use load::{get_weaver_data_dir, load_default};
pub use types::{AppConfig, HttpServerConfig, LoggingConfig, StoreConfig, WorkerConfig};
