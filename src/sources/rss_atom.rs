use std::time::Duration;

use feed_rs::model::Link;
use feed_rs::parser;
use reqwest::blocking::Client;
use url::Url;

use crate::domain::{ParsedFeed, ParsedItem};
use crate::errors::{GatorError, GatorResult};
use crate::sources::traits::FeedFetcher;

pub const USER_AGENT: &str = concat!("gator/", env!("CARGO_PKG_VERSION"));

/// RFC 1123 with a numeric zone, the shape of an RSS `pubDate`.
pub const PUB_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Parse RSS, Atom or JSON Feed bytes into a `ParsedFeed`.
    pub fn parse_bytes(bytes: &[u8]) -> GatorResult<ParsedFeed> {
        let parsed = parser::parse(bytes).map_err(|e| GatorError::FeedParse(e.to_string()))?;

        let items = parsed
            .entries
            .into_iter()
            .map(|entry| {
                let title = entry.title.map(|t| t.content).unwrap_or_default();
                let link = preferred_link(entry.links);
                let description = entry
                    .summary
                    .map(|s| s.content)
                    .or_else(|| entry.content.and_then(|c| c.body))
                    .unwrap_or_default();
                let pub_date = entry
                    .published
                    .or(entry.updated)
                    .map(|dt| dt.format(PUB_DATE_FORMAT).to_string())
                    .unwrap_or_default();

                ParsedItem::new(title, link)
                    .with_description(description)
                    .with_pub_date(pub_date)
            })
            .collect();

        Ok(ParsedFeed {
            title: parsed.title.map(|t| t.content).unwrap_or_default(),
            link: preferred_link(parsed.links),
            description: parsed.description.map(|d| d.content).unwrap_or_default(),
            items,
        })
    }
}

/// The first `alternate` (or untyped) link, else whatever link comes first.
/// Atom entries often list `replies`, `edit` and `self` links ahead of the
/// page itself.
fn preferred_link(links: Vec<Link>) -> String {
    let index = links
        .iter()
        .position(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .unwrap_or(0);
    links
        .into_iter()
        .nth(index)
        .map(|l| l.href)
        .unwrap_or_default()
}

impl Default for HttpFeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedFetcher for HttpFeedFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> GatorResult<ParsedFeed> {
        let parsed_url =
            Url::parse(url).map_err(|e| GatorError::InvalidUrl(format!("{}: {}", url, e)))?;

        let response = self
            .client
            .get(parsed_url)
            .timeout(timeout)
            .send()?
            .error_for_status()?;
        let bytes = response.bytes()?;

        Self::parse_bytes(&bytes)
    }
}
