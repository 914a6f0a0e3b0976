use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{ParsedItem, Post};
use crate::errors::{GatorError, GatorResult};
use crate::sources::rss_atom::PUB_DATE_FORMAT;
use crate::storage::traits::PostRepository;

#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    Created(Post),
    SkippedDuplicate,
}

/// Per-feed tally of one ingestion pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub created: Vec<Post>,
    pub skipped: usize,
    pub failed: usize,
}

pub struct PostIngestor<P: PostRepository> {
    repository: P,
}

impl<P: PostRepository> PostIngestor<P> {
    pub fn new(repository: P) -> Self {
        Self { repository }
    }

    /// Store one feed item as a post. A link that is already stored is a
    /// skip, not an error.
    pub fn ingest(&self, feed_id: Uuid, item: &ParsedItem) -> GatorResult<IngestOutcome> {
        let link = item.link.trim();
        if link.is_empty() {
            return Err(GatorError::Validation(format!(
                "item '{}' has no link",
                item.title
            )));
        }

        let description = Some(item.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let post = Post::new(
            feed_id,
            item.title.clone(),
            link.to_string(),
            description,
            Some(resolve_published_at(item)),
        );

        match self.repository.create(&post) {
            Ok(()) => Ok(IngestOutcome::Created(post)),
            Err(GatorError::Conflict(_)) => {
                debug!(url = %post.url, "post already stored");
                Ok(IngestOutcome::SkippedDuplicate)
            }
            Err(e) => Err(e),
        }
    }

    /// Ingest every item, isolating failures to the item that caused them.
    pub fn ingest_all(&self, feed_id: Uuid, items: &[ParsedItem]) -> IngestReport {
        let mut report = IngestReport::default();

        for item in items {
            match self.ingest(feed_id, item) {
                Ok(IngestOutcome::Created(post)) => report.created.push(post),
                Ok(IngestOutcome::SkippedDuplicate) => report.skipped += 1,
                Err(e) => {
                    warn!(title = %item.title, url = %item.link, error = %e, "failed to save post");
                    report.failed += 1;
                }
            }
        }

        report
    }
}

/// Parse the item's `pubDate`, falling back to the current time.
fn resolve_published_at(item: &ParsedItem) -> DateTime<Utc> {
    match DateTime::parse_from_str(item.pub_date.trim(), PUB_DATE_FORMAT) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(_) => {
            warn!(
                title = %item.title,
                pub_date = %item.pub_date,
                "unparseable publish date, using current time"
            );
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use mockall::predicate::always;

    use crate::domain::Feed;
    use crate::storage::sqlite::{SqliteFeedRepository, SqlitePostRepository, SqliteStorage};
    use crate::storage::traits::{FeedRepository, MockPostRepository};

    fn setup() -> (Uuid, SqliteStorage, PostIngestor<SqlitePostRepository>) {
        let storage = SqliteStorage::in_memory().unwrap();
        let feeds = SqliteFeedRepository::new(storage.clone());
        let feed = Feed::new(
            "Boot.dev".to_string(),
            "https://blog.boot.dev/index.xml".to_string(),
            None,
        );
        feeds.create(&feed).unwrap();

        let ingestor = PostIngestor::new(SqlitePostRepository::new(storage.clone()));
        (feed.id, storage, ingestor)
    }

    fn item(slug: &str) -> ParsedItem {
        ParsedItem::new(slug.to_string(), format!("https://blog.boot.dev/{}", slug))
            .with_description(format!("About {}", slug))
            .with_pub_date("Tue, 02 Jan 2024 15:04:05 -0700".to_string())
    }

    #[test]
    fn test_ingest_creates_post() {
        let (feed_id, _, ingestor) = setup();

        let outcome = ingestor.ingest(feed_id, &item("hello")).unwrap();
        let post = match outcome {
            IngestOutcome::Created(post) => post,
            other => panic!("expected Created, got {:?}", other),
        };

        assert_eq!(post.feed_id, feed_id);
        assert_eq!(post.url, "https://blog.boot.dev/hello");
        assert_eq!(post.description.as_deref(), Some("About hello"));
        assert_eq!(
            post.published_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 22, 4, 5).unwrap())
        );
    }

    #[test]
    fn test_ingest_same_item_twice_stores_one_post() {
        let (feed_id, storage, ingestor) = setup();

        let first = ingestor.ingest(feed_id, &item("hello")).unwrap();
        assert!(matches!(first, IngestOutcome::Created(_)));
        assert_eq!(storage.count_posts(), 1);

        let second = ingestor.ingest(feed_id, &item("hello")).unwrap();
        assert_eq!(second, IngestOutcome::SkippedDuplicate);
        assert_eq!(storage.count_posts(), 1);
    }

    #[test]
    fn test_bad_date_uses_current_time() {
        let (feed_id, _, ingestor) = setup();
        let before = Utc::now();

        let bad = item("dateless").with_pub_date("not-a-date".to_string());
        let outcome = ingestor.ingest(feed_id, &bad).unwrap();

        let post = match outcome {
            IngestOutcome::Created(post) => post,
            other => panic!("expected Created, got {:?}", other),
        };
        let published = post.published_at.unwrap();
        assert!(published >= before);
        assert!(published <= Utc::now() + Duration::seconds(1));
    }

    #[test]
    fn test_empty_description_stored_as_none() {
        let (feed_id, _, ingestor) = setup();

        let bare = item("bare").with_description("   ".to_string());
        match ingestor.ingest(feed_id, &bare).unwrap() {
            IngestOutcome::Created(post) => assert!(post.description.is_none()),
            other => panic!("expected Created, got {:?}", other),
        }
    }

    #[test]
    fn test_item_without_link_rejected() {
        let (feed_id, _, ingestor) = setup();
        let result = ingestor.ingest(feed_id, &ParsedItem::new("No link".to_string(), String::new()));
        assert!(matches!(result, Err(GatorError::Validation(_))));
    }

    #[test]
    fn test_ingest_all_isolates_failures() {
        let (feed_id, storage, ingestor) = setup();
        ingestor.ingest(feed_id, &item("seen")).unwrap();

        let items = vec![
            item("one"),
            item("seen"),
            ParsedItem::new("broken".to_string(), String::new()),
            item("two").with_pub_date("not-a-date".to_string()),
        ];
        let report = ingestor.ingest_all(feed_id, &items);

        assert_eq!(report.created.len(), 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(storage.count_posts(), 3);
    }

    #[test]
    fn test_storage_error_is_not_treated_as_duplicate() {
        let mut repo = MockPostRepository::new();
        repo.expect_create()
            .with(always())
            .returning(|_| Err(GatorError::Database(rusqlite::Error::InvalidQuery)));

        let ingestor = PostIngestor::new(repo);
        let result = ingestor.ingest(Uuid::new_v4(), &item("hello"));
        assert!(matches!(result, Err(GatorError::Database(_))));

        let report = ingestor.ingest_all(Uuid::new_v4(), &[item("a"), item("b")]);
        assert_eq!(report.failed, 2);
        assert!(report.created.is_empty());
    }
}
