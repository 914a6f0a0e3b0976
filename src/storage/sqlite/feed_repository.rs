use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};
use crate::domain::{Feed, FeedWithOwner};
use crate::errors::{GatorError, GatorResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::FeedRepository;

const FEED_COLUMNS: &str = "id, name, url, user_id, last_fetched_at, created_at, updated_at";

pub struct SqliteFeedRepository {
    storage: SqliteStorage,
}

impl SqliteFeedRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Feed> {
        Ok(Feed {
            id: row.get(0)?,
            name: row.get(1)?,
            url: row.get(2)?,
            user_id: row.get(3)?,
            last_fetched_at: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl FeedRepository for SqliteFeedRepository {
    fn create(&self, feed: &Feed) -> GatorResult<()> {
        let conn = self.storage.connection()?;
        conn.execute(
            "INSERT INTO feeds (id, name, url, user_id, last_fetched_at, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                &feed.id,
                &feed.name,
                &feed.url,
                &feed.user_id,
                &feed.last_fetched_at,
                &feed.created_at,
                &feed.updated_at,
            ),
        )
        .map_err(|e| GatorError::from_insert(e, format!("feed {}", feed.url)))?;
        Ok(())
    }

    fn get_all(&self) -> GatorResult<Vec<FeedWithOwner>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(
            "SELECT f.id, f.name, f.url, f.user_id, f.last_fetched_at, f.created_at, f.updated_at, u.name
             FROM feeds f LEFT JOIN users u ON u.id = f.user_id
             ORDER BY f.created_at",
        )?;

        let feeds = stmt.query_map([], |row| {
            Ok(FeedWithOwner {
                feed: Self::from_row(row)?,
                owner_name: row.get(7)?,
            })
        })?;

        feeds.collect::<Result<Vec<_>, _>>().map_err(GatorError::from)
    }

    fn get_by_url(&self, url: &str) -> GatorResult<Option<Feed>> {
        let conn = self.storage.connection()?;
        let feed = conn
            .query_row(
                &format!("SELECT {} FROM feeds WHERE url = ?1", FEED_COLUMNS),
                [url],
                Self::from_row,
            )
            .optional()?;
        Ok(feed)
    }

    fn claim_next_to_fetch(&self, now: DateTime<Utc>) -> GatorResult<Feed> {
        let conn = self.storage.connection()?;
        // Select and mark in one statement so concurrent schedulers never
        // claim the same feed.
        let feed = conn
            .query_row(
                &format!(
                    "UPDATE feeds SET last_fetched_at = ?1, updated_at = ?1
                     WHERE id = (
                         SELECT id FROM feeds
                         ORDER BY last_fetched_at ASC NULLS FIRST, created_at ASC
                         LIMIT 1
                     )
                     RETURNING {}",
                    FEED_COLUMNS
                ),
                [now],
                Self::from_row,
            )
            .optional()?;

        feed.ok_or(GatorError::NoFeeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn setup_repo() -> (SqliteStorage, SqliteFeedRepository) {
        let storage = SqliteStorage::in_memory().unwrap();
        (storage.clone(), SqliteFeedRepository::new(storage))
    }

    fn feed(name: &str) -> Feed {
        Feed::new(
            name.to_string(),
            format!("https://{}.example.com/feed.xml", name),
            None,
        )
    }

    #[test]
    fn test_create_and_get_by_url() {
        let (_storage, repo) = setup_repo();
        let blog = feed("blog");
        repo.create(&blog).unwrap();

        let retrieved = repo.get_by_url(&blog.url).unwrap().unwrap();
        assert_eq!(retrieved.id, blog.id);
        assert_eq!(retrieved.name, "blog");
        assert!(retrieved.last_fetched_at.is_none());
    }

    #[test]
    fn test_duplicate_url_rejected() {
        let (_storage, repo) = setup_repo();
        let blog = feed("blog");
        repo.create(&blog).unwrap();

        let again = Feed::new("Other name".to_string(), blog.url.clone(), None);
        assert!(matches!(repo.create(&again), Err(GatorError::Conflict(_))));
    }

    #[test]
    fn test_get_all_without_owner() {
        let (_storage, repo) = setup_repo();
        repo.create(&feed("a")).unwrap();
        repo.create(&feed("b")).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|f| f.owner_name.is_none()));
    }

    #[test]
    fn test_claim_with_no_feeds() {
        let (_storage, repo) = setup_repo();
        assert!(matches!(
            repo.claim_next_to_fetch(Utc::now()),
            Err(GatorError::NoFeeds)
        ));
    }

    #[test]
    fn test_claim_prefers_never_fetched() {
        let (storage, repo) = setup_repo();
        let now = Utc::now();

        let fetched = feed("fetched");
        repo.create(&fetched).unwrap();
        storage.set_last_fetched(fetched.id, now - Duration::hours(1));

        let fresh = feed("fresh");
        repo.create(&fresh).unwrap();

        let claimed = repo.claim_next_to_fetch(now).unwrap();
        assert_eq!(claimed.id, fresh.id);
        assert_eq!(claimed.last_fetched_at, Some(now));
    }

    #[test]
    fn test_claim_picks_oldest_timestamp() {
        let (storage, repo) = setup_repo();
        let now = Utc::now();

        let ages = [("two", 2), ("five", 5), ("one", 1), ("three", 3)];
        for (name, hours) in ages {
            let f = feed(name);
            repo.create(&f).unwrap();
            storage.set_last_fetched(f.id, now - Duration::hours(hours));
        }
        let never = feed("never");
        repo.create(&never).unwrap();

        let order: Vec<String> = (0..5)
            .map(|_| repo.claim_next_to_fetch(now).unwrap().name)
            .collect();
        assert_eq!(order, vec!["never", "five", "three", "two", "one"]);
    }

    #[test]
    fn test_claim_marks_feed() {
        let (_storage, repo) = setup_repo();
        let blog = feed("blog");
        repo.create(&blog).unwrap();

        let now = Utc::now();
        repo.claim_next_to_fetch(now).unwrap();

        let stored = repo.get_by_url(&blog.url).unwrap().unwrap();
        assert_eq!(stored.last_fetched_at, Some(now));
    }
}
