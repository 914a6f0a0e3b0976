pub mod normalize;
pub mod rss_atom;
pub mod traits;

pub use normalize::normalize;
pub use rss_atom::HttpFeedFetcher;
pub use traits::FeedFetcher;
