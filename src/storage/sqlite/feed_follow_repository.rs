use chrono::Utc;
use rusqlite::Row;
use uuid::Uuid;

use crate::domain::FeedFollow;
use crate::errors::{GatorError, GatorResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::FeedFollowRepository;

const FOLLOW_SELECT: &str = "SELECT ff.id, ff.user_id, ff.feed_id, u.name, f.name, ff.created_at, ff.updated_at
     FROM feed_follows ff
     JOIN users u ON u.id = ff.user_id
     JOIN feeds f ON f.id = ff.feed_id";

pub struct SqliteFeedFollowRepository {
    storage: SqliteStorage,
}

impl SqliteFeedFollowRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<FeedFollow> {
        Ok(FeedFollow {
            id: row.get(0)?,
            user_id: row.get(1)?,
            feed_id: row.get(2)?,
            user_name: row.get(3)?,
            feed_name: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl FeedFollowRepository for SqliteFeedFollowRepository {
    fn create(&self, user_id: Uuid, feed_id: Uuid) -> GatorResult<FeedFollow> {
        let conn = self.storage.connection()?;
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO feed_follows (id, user_id, feed_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
            (&id, &user_id, &feed_id, &now),
        )
        .map_err(|e| GatorError::from_insert(e, "feed is already followed"))?;

        let follow = conn.query_row(
            &format!("{} WHERE ff.id = ?1", FOLLOW_SELECT),
            [id],
            Self::from_row,
        )?;
        Ok(follow)
    }

    fn list_for_user(&self, user_id: Uuid) -> GatorResult<Vec<FeedFollow>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE ff.user_id = ?1 ORDER BY ff.created_at, f.name",
            FOLLOW_SELECT
        ))?;

        let follows = stmt.query_map([user_id], Self::from_row)?;
        follows.collect::<Result<Vec<_>, _>>().map_err(GatorError::from)
    }

    fn delete_for_user_by_url(&self, user_id: Uuid, url: &str) -> GatorResult<()> {
        let conn = self.storage.connection()?;
        let deleted = conn.execute(
            "DELETE FROM feed_follows
             WHERE user_id = ?1 AND feed_id IN (SELECT id FROM feeds WHERE url = ?2)",
            (&user_id, url),
        )?;

        if deleted == 0 {
            return Err(GatorError::NotFound(format!("no followed feed at {}", url)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Feed, User};
    use crate::storage::sqlite::{SqliteFeedRepository, SqliteUserRepository};
    use crate::storage::traits::{FeedRepository, UserRepository};

    fn setup() -> (User, Feed, SqliteFeedFollowRepository) {
        let storage = SqliteStorage::in_memory().unwrap();
        let users = SqliteUserRepository::new(storage.clone());
        let feeds = SqliteFeedRepository::new(storage.clone());

        let user = User::new("kahya".to_string());
        users.create(&user).unwrap();
        let feed = Feed::new(
            "Boot.dev Blog".to_string(),
            "https://blog.boot.dev/index.xml".to_string(),
            Some(user.id),
        );
        feeds.create(&feed).unwrap();

        (user, feed, SqliteFeedFollowRepository::new(storage))
    }

    #[test]
    fn test_follow_and_list() {
        let (user, feed, repo) = setup();

        let follow = repo.create(user.id, feed.id).unwrap();
        assert_eq!(follow.user_name, "kahya");
        assert_eq!(follow.feed_name, "Boot.dev Blog");

        let follows = repo.list_for_user(user.id).unwrap();
        assert_eq!(follows.len(), 1);
        assert_eq!(follows[0].feed_id, feed.id);
    }

    #[test]
    fn test_follow_twice_rejected() {
        let (user, feed, repo) = setup();
        repo.create(user.id, feed.id).unwrap();

        let result = repo.create(user.id, feed.id);
        assert!(matches!(result, Err(GatorError::Conflict(_))));
    }

    #[test]
    fn test_unfollow_by_url() {
        let (user, feed, repo) = setup();
        repo.create(user.id, feed.id).unwrap();

        repo.delete_for_user_by_url(user.id, &feed.url).unwrap();
        assert!(repo.list_for_user(user.id).unwrap().is_empty());
    }

    #[test]
    fn test_unfollow_not_followed() {
        let (user, _, repo) = setup();
        let result = repo.delete_for_user_by_url(user.id, "https://nowhere.example.com/rss");
        assert!(matches!(result, Err(GatorError::NotFound(_))));
    }
}
