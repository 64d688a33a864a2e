//! Chunk table listing without the web shell.

use weaver_core::api::{AppConfig, ChunkStore, CliError, SqliteChunkStore};

use super::cli::ChunksArgs;

pub async fn handle_chunks(args: ChunksArgs, cfg: AppConfig) -> Result<(), CliError> {
    let path = args.store_path.unwrap_or(cfg.store.path);
    let store = SqliteChunkStore::open(&path).map_err(|e| CliError::Store(e.to_string()))?;
    let rows = store
        .list()
        .await
        .map_err(|e| CliError::Store(e.to_string()))?;
    let json =
        serde_json::to_string_pretty(&rows).map_err(|e| CliError::Command(e.to_string()))?;
    println!("{json}");
    Ok(())
}
