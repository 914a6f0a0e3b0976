use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatorError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Argument errors
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),

    // Session errors
    #[error("Not logged in: {0}")]
    NotAuthenticated(String),

    // Lookup errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("No feeds to fetch")]
    NoFeeds,

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Parsing errors
    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatorError {
    /// Network and storage failures that only cost the current unit of work.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatorError::Http(_) | GatorError::FeedParse(_) | GatorError::Database(_)
        )
    }

    /// Maps a SQLite unique-constraint violation to `Conflict`, leaving every
    /// other failure as a database error.
    pub fn from_insert(err: rusqlite::Error, what: impl Into<String>) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _)
                if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                GatorError::Conflict(what.into())
            }
            _ => GatorError::Database(err),
        }
    }
}

pub type GatorResult<T> = Result<T, GatorError>;
