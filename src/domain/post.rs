use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    /// Canonical link, unique across all posts.
    pub url: String,
    pub description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub feed_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        feed_id: Uuid,
        title: String,
        url: String,
        description: Option<String>,
        published_at: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            url,
            description,
            published_at,
            feed_id,
            created_at: now,
            updated_at: now,
        }
    }
}
