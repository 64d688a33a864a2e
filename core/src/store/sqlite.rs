use anyhow::Result;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::Mutex;

use super::{ChunkRow, ChunkStore, NewChunk};

/// SQLite-backed chunk table.
pub struct SqliteChunkStore {
    conn: Mutex<Connection>,
}

impl SqliteChunkStore {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS raw_text_chunk (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL DEFAULT '',
                filename TEXT NOT NULL DEFAULT '',
                speaker TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }
}

#[async_trait]
impl ChunkStore for SqliteChunkStore {
    async fn insert(&self, chunk: NewChunk) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO raw_text_chunk (timestamp, filename, speaker, content)
             VALUES (?1, ?2, ?3, ?4)",
            params![chunk.timestamp, chunk.filename, chunk.speaker, chunk.content],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn list(&self) -> Result<Vec<ChunkRow>> {
        let conn = self.conn.lock().unwrap();
        // Same-second inserts tie on created_at; id breaks the tie so the
        // order stays newest-first.
        let mut stmt = conn.prepare(
            "SELECT id, timestamp, filename, speaker, content, created_at
             FROM raw_text_chunk
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ChunkRow {
                    id: row.get(0)?,
                    timestamp: row.get(1)?,
                    filename: row.get(2)?,
                    speaker: row.get(3)?,
                    content: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    async fn count(&self) -> Result<u64> {
        let conn = self.conn.lock().unwrap();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM raw_text_chunk", [], |row| row.get(0))?;
        Ok(n as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chunk(filename: &str, content: &str) -> NewChunk {
        NewChunk {
            timestamp: "00:00:01".to_string(),
            filename: filename.to_string(),
            speaker: "narrator".to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_list_roundtrip() {
        let store = SqliteChunkStore::in_memory().unwrap();
        let id = store.insert(chunk("ep1.txt", "once upon a time")).await.unwrap();
        assert!(id > 0);

        let rows = store.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].filename, "ep1.txt");
        assert_eq!(rows[0].content, "once upon a time");
        assert_eq!(rows[0].speaker, "narrator");
        assert!(!rows[0].created_at.is_empty());
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let store = SqliteChunkStore::in_memory().unwrap();
        store.insert(chunk("a.txt", "first")).await.unwrap();
        store.insert(chunk("b.txt", "second")).await.unwrap();
        store.insert(chunk("c.txt", "third")).await.unwrap();

        let rows = store.list().await.unwrap();
        let contents: Vec<&str> = rows.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn count_tracks_inserts() {
        let store = SqliteChunkStore::in_memory().unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        store.insert(chunk("a.txt", "x")).await.unwrap();
        store.insert(chunk("b.txt", "y")).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunks.db");
        let path = path.to_str().unwrap();

        {
            let store = SqliteChunkStore::open(path).unwrap();
            store.insert(chunk("kept.txt", "persisted")).await.unwrap();
        }

        let store = SqliteChunkStore::open(path).unwrap();
        let rows = store.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].filename, "kept.txt");
    }
}
