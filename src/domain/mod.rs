pub mod feed;
pub mod parsed;
pub mod post;
pub mod session;
pub mod user;

pub use feed::{Feed, FeedFollow, FeedWithOwner};
pub use parsed::{ParsedFeed, ParsedItem};
pub use post::Post;
pub use session::Session;
pub use user::User;
