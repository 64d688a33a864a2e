pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use sqlite::SqliteChunkStore;

/// One row of the transcript-chunk table rendered by the viewer page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRow {
    pub id: i64,
    pub timestamp: String,
    pub filename: String,
    pub speaker: String,
    pub content: String,
    pub created_at: String,
}

/// Fields for a row to be inserted; `id` and `created_at` are assigned by
/// the store.
#[derive(Debug, Clone)]
pub struct NewChunk {
    pub timestamp: String,
    pub filename: String,
    pub speaker: String,
    pub content: String,
}

/// Chunk persistence. The viewer only reads; `insert` exists for seeding
/// and tests.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    async fn insert(&self, chunk: NewChunk) -> Result<i64>;
    /// All rows, newest first.
    async fn list(&self) -> Result<Vec<ChunkRow>>;
    async fn count(&self) -> Result<u64>;
}
