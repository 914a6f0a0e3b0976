use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::domain::Feed;
use crate::errors::{GatorError, GatorResult};
use crate::services::ingest_service::{IngestReport, PostIngestor};
use crate::sources::{normalize, FeedFetcher};
use crate::storage::traits::{FeedRepository, PostRepository};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of one scheduler tick: the feed that was claimed and what its
/// items turned into.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub feed: Feed,
    pub report: IngestReport,
}

/// Asks a running scheduler to stop. Dropping it has the same effect.
pub struct StopHandle {
    tx: mpsc::Sender<()>,
}

impl StopHandle {
    pub fn stop(&self) {
        let _ = self.tx.send(());
    }
}

pub struct StopSignal {
    rx: mpsc::Receiver<()>,
}

impl StopSignal {
    /// Sleep for up to `timeout`. Returns `true` once a stop was requested.
    pub fn wait(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) => false,
        }
    }
}

pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = mpsc::channel();
    (StopHandle { tx }, StopSignal { rx })
}

pub struct AggregationScheduler<F: FeedRepository, P: PostRepository, X: FeedFetcher> {
    feed_repository: F,
    ingestor: PostIngestor<P>,
    fetcher: X,
    fetch_timeout: Duration,
}

impl<F: FeedRepository, P: PostRepository, X: FeedFetcher> AggregationScheduler<F, P, X> {
    pub fn new(feed_repository: F, post_repository: P, fetcher: X) -> Self {
        Self {
            feed_repository,
            ingestor: PostIngestor::new(post_repository),
            fetcher,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Claim the most overdue feed, fetch it and store its items.
    ///
    /// The claim stamps the feed before the fetch starts, so a feed that
    /// fails here waits behind every other feed before it is tried again.
    pub fn tick(&self) -> GatorResult<TickReport> {
        let feed = self.feed_repository.claim_next_to_fetch(Utc::now())?;
        info!(feed = %feed.name, url = %feed.url, "claimed feed");

        let parsed = self.fetcher.fetch(&feed.url, self.fetch_timeout)?;
        let parsed = normalize(parsed);
        debug!(feed = %feed.name, items = parsed.items.len(), "fetched feed");

        let report = self.ingestor.ingest_all(feed.id, &parsed.items);
        info!(
            feed = %feed.name,
            created = report.created.len(),
            skipped = report.skipped,
            failed = report.failed,
            "ingested feed"
        );

        Ok(TickReport { feed, report })
    }

    /// Tick now and then every `interval` until `stop` fires. Tick errors
    /// are logged and never end the loop.
    pub fn run<C>(&self, interval: Duration, stop: &StopSignal, mut on_tick: C)
    where
        C: FnMut(&TickReport),
    {
        info!(interval = ?interval, "scheduler started");

        loop {
            match self.tick() {
                Ok(report) => on_tick(&report),
                Err(GatorError::NoFeeds) => warn!("no feeds to fetch yet"),
                Err(e) if e.is_transient() => {
                    warn!(error = %e, "tick failed, feed waits for its next turn")
                }
                Err(e) => error!(error = %e, "tick failed"),
            }

            if stop.wait(interval) {
                info!("scheduler stopped");
                return;
            }
        }
    }
}

/// Parse a duration such as `1m`, `30s`, `1h30m` or `1.5h`.
pub fn parse_interval(input: &str) -> GatorResult<Duration> {
    let invalid = || GatorError::Validation(format!("could not parse duration '{}'", input));

    let mut rest = input.trim();
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total_nanos = 0f64;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        if number_len == 0 {
            return Err(invalid());
        }
        let value: f64 = rest[..number_len].parse().map_err(|_| invalid())?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let nanos_per_unit = match &rest[..unit_len] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return Err(invalid()),
        };
        rest = &rest[unit_len..];

        total_nanos += value * nanos_per_unit;
    }

    let total_nanos = total_nanos.round();
    if total_nanos < 1.0 || total_nanos > u64::MAX as f64 {
        return Err(GatorError::Validation(format!(
            "duration '{}' must be positive",
            input
        )));
    }
    Ok(Duration::from_nanos(total_nanos as u64))
}
