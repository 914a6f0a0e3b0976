use rusqlite::Row;
use uuid::Uuid;

use crate::domain::Post;
use crate::errors::{GatorError, GatorResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::PostRepository;

pub struct SqlitePostRepository {
    storage: SqliteStorage,
}

impl SqlitePostRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
        Ok(Post {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            description: row.get(3)?,
            published_at: row.get(4)?,
            feed_id: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

impl PostRepository for SqlitePostRepository {
    fn create(&self, post: &Post) -> GatorResult<()> {
        let conn = self.storage.connection()?;
        conn.execute(
            "INSERT INTO posts (id, title, url, description, published_at, feed_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            (
                &post.id,
                &post.title,
                &post.url,
                &post.description,
                &post.published_at,
                &post.feed_id,
                &post.created_at,
                &post.updated_at,
            ),
        )
        .map_err(|e| GatorError::from_insert(e, format!("post {}", post.url)))?;
        Ok(())
    }

    fn list_for_user(&self, user_id: Uuid, limit: usize) -> GatorResult<Vec<Post>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.title, p.url, p.description, p.published_at, p.feed_id, p.created_at, p.updated_at
             FROM posts p
             JOIN feed_follows ff ON ff.feed_id = p.feed_id
             WHERE ff.user_id = ?1
             ORDER BY p.published_at DESC NULLS LAST, p.created_at DESC
             LIMIT ?2",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let posts = stmt.query_map((&user_id, limit), Self::from_row)?;
        posts.collect::<Result<Vec<_>, _>>().map_err(GatorError::from)
    }
}
