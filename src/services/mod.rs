pub mod feed_service;
pub mod ingest_service;
pub mod scheduler;

pub use feed_service::FeedService;
pub use ingest_service::{IngestOutcome, IngestReport, PostIngestor};
pub use scheduler::{
    parse_interval, stop_channel, AggregationScheduler, StopHandle, StopSignal, TickReport,
};
