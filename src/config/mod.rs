use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::Session;
use crate::errors::{GatorError, GatorResult};

pub const CONFIG_FILE_NAME: &str = ".gatorconfig.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub db_url: String,
    #[serde(default)]
    pub current_user_name: Option<String>,
    #[serde(skip)]
    path: PathBuf,
    #[serde(skip)]
    db_url_override: Option<String>,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    fn load_env() {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();
    }

    fn default_path() -> GatorResult<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_FILE_NAME))
            .ok_or_else(|| GatorError::Config("could not locate home directory".to_string()))
    }

    fn default_db_url() -> String {
        dirs::home_dir()
            .map(|home| home.join(".gator.db").to_string_lossy().into_owned())
            .unwrap_or_else(|| "./gator.db".to_string())
    }

    /// Read the config from `GATOR_CONFIG` or `~/.gatorconfig.json`.
    pub fn read() -> GatorResult<Self> {
        Self::load_env();

        let path = match std::env::var("GATOR_CONFIG") {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => Self::default_path()?,
        };

        let mut config = Self::load_from(path)?;
        config.db_url_override = std::env::var("GATOR_DB_URL").ok().filter(|u| !u.is_empty());
        Ok(config)
    }

    /// Read the config at `path`; a missing file yields the defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> GatorResult<Self> {
        let path = path.as_ref().to_path_buf();

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str::<Config>(&content).map_err(|e| {
                GatorError::Config(format!("could not parse {}: {}", path.display(), e))
            })?
        } else {
            Config {
                db_url: Self::default_db_url(),
                current_user_name: None,
                path: PathBuf::new(),
                db_url_override: None,
            }
        };

        config.path = path;
        Ok(config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filesystem location of the SQLite database.
    pub fn database_path(&self) -> PathBuf {
        let url = self.db_url_override.as_deref().unwrap_or(&self.db_url);
        let stripped = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);

        match (stripped.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(stripped),
        }
    }

    pub fn session(&self) -> Session {
        Session::new(self.current_user_name.clone())
    }

    /// Make `name` the current user and write the config back to disk.
    pub fn set_current_user(&mut self, name: &str) -> GatorResult<()> {
        self.current_user_name = Some(name.to_string());
        self.write()
    }

    fn write(&self) -> GatorResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_string_pretty(self)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
