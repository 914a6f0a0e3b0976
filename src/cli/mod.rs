pub mod commands;
pub mod handlers;
pub mod middleware;
pub mod registry;

pub use commands::Cli;
pub use handlers::default_commands;
pub use middleware::require_user;
pub use registry::{AppState, Command, Commands, Handler};
