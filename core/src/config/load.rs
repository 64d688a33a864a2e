use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default weaver data directory: ~/.weaver
pub fn get_weaver_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".weaver"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.weaver/config.toml (highest)
    let weaver_dir = get_weaver_data_dir()?;
    let weaver_config = weaver_dir.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg: AppConfig = if weaver_config.exists() {
        let s = std::fs::read_to_string(&weaver_config)?;
        toml::from_str::<AppConfig>(&s)?
    } else if local_config.exists() {
        let s = std::fs::read_to_string(local_config)?;
        toml::from_str::<AppConfig>(&s)?
    } else {
        AppConfig::default()
    };

    // Move the chunk database into the weaver data directory if using default
    if cfg.store.path == "./chunks.db" {
        std::fs::create_dir_all(&weaver_dir)?;
        cfg.store.path = weaver_dir.join("chunks.db").to_string_lossy().to_string();
    }

    // Update logging directory to use weaver data directory if not set
    if cfg.logging.directory.is_none()
        || cfg
            .logging
            .directory
            .as_ref()
            .map(|s| s.trim().is_empty())
            .unwrap_or(false)
    {
        let logs_dir = weaver_dir.join("logs");
        std::fs::create_dir_all(&logs_dir)?;
        cfg.logging.directory = Some(logs_dir.to_string_lossy().to_string());
    }

    // Environment variable overrides (Priority 0: highest)
    if let Ok(v) = std::env::var("WEAVER_WORKER_PROGRAM") {
        if !v.trim().is_empty() {
            cfg.worker.program = v;
        }
    }
    if let Ok(v) = std::env::var("WEAVER_STORE_PATH") {
        if !v.trim().is_empty() {
            cfg.store.path = v;
        }
    }

    Ok(cfg)
}
