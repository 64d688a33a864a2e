use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub worker: WorkerConfig,

    #[serde(default)]
    pub http_server: HttpServerConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            worker: WorkerConfig::default(),
            http_server: HttpServerConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "weaver_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

/// External worker process configuration.
///
/// The worker is a fixed program identity; per-request input fields are
/// appended as discrete trailing argv slots and are never spliced into the
/// program text or a shell command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    #[serde(default = "default_worker_program")]
    pub program: String,

    /// Fixed leading arguments. The two input fields follow these.
    #[serde(default = "default_worker_args")]
    pub args: Vec<String>,

    /// Extra environment variables for the worker process.
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Hard wall-clock budget for one invocation (spawn through exit).
    #[serde(default = "default_worker_timeout_ms")]
    pub timeout_ms: u64,

    /// How long to keep draining output after a kill before giving up.
    #[serde(default = "default_worker_kill_grace_ms")]
    pub kill_grace_ms: u64,

    /// Retained tail per output stream. The streams are always drained to
    /// EOF; only the kept bytes are bounded.
    #[serde(default = "default_worker_capture_bytes")]
    pub capture_bytes: usize,

    /// Maximum concurrent worker processes. 0 = unbounded.
    #[serde(default)]
    pub max_concurrent: usize,
}

fn default_worker_program() -> String {
    "python3".to_string()
}

fn default_worker_args() -> Vec<String> {
    vec![
        "-c".to_string(),
        "import sys\nprint(sys.argv[1] + \" \" + sys.argv[2])".to_string(),
    ]
}

fn default_worker_timeout_ms() -> u64 {
    15_000
}

fn default_worker_kill_grace_ms() -> u64 {
    2_000
}

fn default_worker_capture_bytes() -> usize {
    1_048_576
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            program: default_worker_program(),
            args: default_worker_args(),
            env: HashMap::new(),
            timeout_ms: default_worker_timeout_ms(),
            kill_grace_ms: default_worker_kill_grace_ms(),
            capture_bytes: default_worker_capture_bytes(),
            max_concurrent: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_host")]
    pub host: String,

    #[serde(default = "default_http_port")]
    pub port: u16,
}

fn default_http_host() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    8080
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file holding the chunk table.
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    "./chunks.db".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}
