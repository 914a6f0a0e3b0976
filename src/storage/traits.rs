use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Feed, FeedFollow, FeedWithOwner, Post, User};
use crate::errors::GatorResult;

#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` if the name is taken.
    fn create(&self, user: &User) -> GatorResult<()>;
    fn get_by_name(&self, name: &str) -> GatorResult<Option<User>>;
    fn delete_all(&self) -> GatorResult<usize>;
    fn list_names(&self) -> GatorResult<Vec<String>>;
}

#[cfg_attr(test, mockall::automock)]
pub trait FeedRepository: Send + Sync {
    /// Fails with `Conflict` if the URL is taken.
    fn create(&self, feed: &Feed) -> GatorResult<()>;
    fn get_all(&self) -> GatorResult<Vec<FeedWithOwner>>;
    fn get_by_url(&self, url: &str) -> GatorResult<Option<Feed>>;

    /// Atomically selects the feed fetched least recently (never-fetched
    /// first) and stamps it with `now`. Fails with `NoFeeds` when empty.
    fn claim_next_to_fetch(&self, now: DateTime<Utc>) -> GatorResult<Feed>;
}

#[cfg_attr(test, mockall::automock)]
pub trait FeedFollowRepository: Send + Sync {
    /// Fails with `Conflict` if the user already follows the feed.
    fn create(&self, user_id: Uuid, feed_id: Uuid) -> GatorResult<FeedFollow>;
    fn list_for_user(&self, user_id: Uuid) -> GatorResult<Vec<FeedFollow>>;
    /// Fails with `NotFound` if the user does not follow a feed at `url`.
    fn delete_for_user_by_url(&self, user_id: Uuid, url: &str) -> GatorResult<()>;
}

#[cfg_attr(test, mockall::automock)]
pub trait PostRepository: Send + Sync {
    /// Fails with `Conflict` if a post with the same link exists.
    fn create(&self, post: &Post) -> GatorResult<()>;
    fn list_for_user(&self, user_id: Uuid, limit: usize) -> GatorResult<Vec<Post>>;
}
