use std::collections::HashMap;

use crate::config::Config;
use crate::domain::Session;
use crate::errors::{GatorError, GatorResult};
use crate::services::FeedService;
use crate::storage::sqlite::{
    SqliteFeedFollowRepository, SqliteFeedRepository, SqlitePostRepository, SqliteStorage,
    SqliteUserRepository,
};

/// A command name plus its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Required positional argument at `index`.
    pub fn arg(&self, index: usize, what: &str) -> GatorResult<&str> {
        self.args
            .get(index)
            .map(String::as_str)
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| {
                GatorError::Validation(format!("{} expects a {} argument", self.name, what))
            })
    }
}

/// Everything a handler can touch during one invocation.
pub struct AppState {
    pub config: Config,
    pub session: Session,
    pub storage: SqliteStorage,
}

impl AppState {
    pub fn new(config: Config, storage: SqliteStorage) -> Self {
        let session = config.session();
        Self {
            config,
            session,
            storage,
        }
    }

    pub fn users(&self) -> SqliteUserRepository {
        SqliteUserRepository::new(self.storage.clone())
    }

    pub fn feeds(&self) -> SqliteFeedRepository {
        SqliteFeedRepository::new(self.storage.clone())
    }

    pub fn posts(&self) -> SqlitePostRepository {
        SqlitePostRepository::new(self.storage.clone())
    }

    pub fn feed_service(&self) -> FeedService<SqliteFeedRepository, SqliteFeedFollowRepository> {
        FeedService::new(self.feeds(), SqliteFeedFollowRepository::new(self.storage.clone()))
    }
}

pub type Handler = Box<dyn Fn(&mut AppState, &Command) -> GatorResult<()>>;

/// Maps command names to their handlers.
#[derive(Default)]
pub struct Commands {
    handlers: HashMap<String, Handler>,
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`. A name can only be registered once.
    pub fn register<H>(&mut self, name: &str, handler: H) -> GatorResult<()>
    where
        H: Fn(&mut AppState, &Command) -> GatorResult<()> + 'static,
    {
        if self.handlers.contains_key(name) {
            return Err(GatorError::Conflict(format!("command {}", name)));
        }
        self.handlers.insert(name.to_string(), Box::new(handler));
        Ok(())
    }

    pub fn dispatch(&self, state: &mut AppState, command: &Command) -> GatorResult<()> {
        let handler = self
            .handlers
            .get(&command.name)
            .ok_or_else(|| GatorError::UnknownCommand(command.name.clone()))?;

        handler(state, command)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
