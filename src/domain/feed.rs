use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Feed {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub user_id: Option<Uuid>,
    /// `None` until the scheduler claims the feed for the first time.
    pub last_fetched_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Feed {
    pub fn new(name: String, url: String, user_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            url,
            user_id,
            last_fetched_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A feed listed together with the name of its owner, if it has one.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedWithOwner {
    pub feed: Feed,
    pub owner_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedFollow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub feed_id: Uuid,
    pub user_name: String,
    pub feed_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
