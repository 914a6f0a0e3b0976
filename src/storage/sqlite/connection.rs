use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::errors::{GatorError, GatorResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BLOB PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS feeds (
    id BLOB PRIMARY KEY,
    name TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE,
    user_id BLOB REFERENCES users(id) ON DELETE SET NULL,
    last_fetched_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_feeds_last_fetched_at ON feeds(last_fetched_at);

CREATE TABLE IF NOT EXISTS feed_follows (
    id BLOB PRIMARY KEY,
    user_id BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    feed_id BLOB NOT NULL REFERENCES feeds(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (user_id, feed_id)
);

CREATE TABLE IF NOT EXISTS posts (
    id BLOB PRIMARY KEY,
    title TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE,
    description TEXT,
    published_at TEXT,
    feed_id BLOB NOT NULL REFERENCES feeds(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_posts_feed_id ON posts(feed_id);
"#;

#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> GatorResult<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> GatorResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> GatorResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, GatorError> {
        self.conn
            .lock()
            .map_err(|_| GatorError::Database(rusqlite::Error::InvalidQuery))
    }
}

#[cfg(test)]
impl SqliteStorage {
    /// Backdate a feed's last fetch for claim-order tests.
    pub(crate) fn set_last_fetched(
        &self,
        feed_id: uuid::Uuid,
        at: chrono::DateTime<chrono::Utc>,
    ) {
        let conn = self.connection().unwrap();
        let updated = conn
            .execute(
                "UPDATE feeds SET last_fetched_at = ?1 WHERE id = ?2",
                (&at, &feed_id),
            )
            .unwrap();
        assert_eq!(updated, 1, "no feed with id {}", feed_id);
    }

    pub(crate) fn count_posts(&self) -> usize {
        let conn = self.connection().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
            .unwrap();
        count as usize
    }
}
