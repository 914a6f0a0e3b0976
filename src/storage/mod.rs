pub mod traits;
pub mod sqlite;

pub use traits::{FeedFollowRepository, FeedRepository, PostRepository, UserRepository};
pub use sqlite::{
    SqliteFeedFollowRepository, SqliteFeedRepository, SqlitePostRepository, SqliteStorage,
    SqliteUserRepository,
};
