use std::time::Duration;

use crate::domain::ParsedFeed;
use crate::errors::GatorResult;

#[cfg_attr(test, mockall::automock)]
pub trait FeedFetcher: Send + Sync {
    /// Retrieve and parse the feed at `url`, giving up after `timeout`.
    fn fetch(&self, url: &str, timeout: Duration) -> GatorResult<ParsedFeed>;
}
