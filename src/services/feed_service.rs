use url::Url;

use crate::domain::{Feed, FeedFollow, FeedWithOwner, User};
use crate::errors::{GatorError, GatorResult};
use crate::storage::traits::{FeedFollowRepository, FeedRepository};

pub struct FeedService<R: FeedRepository, F: FeedFollowRepository> {
    repository: R,
    follows: F,
}

impl<R: FeedRepository, F: FeedFollowRepository> FeedService<R, F> {
    pub fn new(repository: R, follows: F) -> Self {
        Self { repository, follows }
    }

    /// Add a new feed owned by `user` and follow it on their behalf
    pub fn add(&self, user: &User, name: &str, url: &str) -> GatorResult<(Feed, FeedFollow)> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GatorError::Validation("feed name cannot be empty".to_string()));
        }
        let url = validate_url(url)?;

        // Check if already exists
        if self.repository.get_by_url(&url)?.is_some() {
            return Err(GatorError::Conflict(format!("feed {}", url)));
        }

        let feed = Feed::new(name.to_string(), url, Some(user.id));
        self.repository.create(&feed)?;

        let follow = self.follows.create(user.id, feed.id)?;
        Ok((feed, follow))
    }

    /// List all feeds with their owners
    pub fn list(&self) -> GatorResult<Vec<FeedWithOwner>> {
        self.repository.get_all()
    }

    pub fn follow(&self, user: &User, url: &str) -> GatorResult<FeedFollow> {
        let feed = self
            .repository
            .get_by_url(url.trim())?
            .ok_or_else(|| GatorError::NotFound(format!("feed {}", url)))?;

        self.follows.create(user.id, feed.id)
    }

    pub fn following(&self, user: &User) -> GatorResult<Vec<FeedFollow>> {
        self.follows.list_for_user(user.id)
    }

    pub fn unfollow(&self, user: &User, url: &str) -> GatorResult<()> {
        self.follows.delete_for_user_by_url(user.id, url.trim())
    }
}

fn validate_url(url: &str) -> GatorResult<String> {
    let parsed = Url::parse(url.trim()).map_err(|e| GatorError::InvalidUrl(format!("{}: {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(url.trim().to_string()),
        other => Err(GatorError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            url, other
        ))),
    }
}
