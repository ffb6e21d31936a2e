//! Settings
//!
//! Defaults, then an optional TOML file, then `TODO_LISTS_*` environment
//! variables. Each layer only overrides what it sets.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{IdGenerator, SequentialIds, TimestampIds, UuidIds};
use crate::repository::{
    CollectionGateway, FileStore, KeyValueStore, MemoryStore, PersistenceError, SqliteStore, DEFAULT_STORAGE_KEY,
};

const ENV_STORAGE_KEY: &str = "TODO_LISTS_STORAGE_KEY";
const ENV_BACKEND: &str = "TODO_LISTS_BACKEND";
const ENV_DATA_PATH: &str = "TODO_LISTS_DATA_PATH";
const ENV_SEED: &str = "TODO_LISTS_SEED";
const ENV_LOG_DIR: &str = "TODO_LISTS_LOG_DIR";

/// Name of the log file (and its archives) under `log_dir`
pub const LOG_APP_NAME: &str = "todo-lists";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Storage error: {0}")]
    Storage(#[from] PersistenceError),
    #[error("Logger error: {0}")]
    Logger(#[from] rolling_logger::LoggerError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    Sqlite,
    File,
}

impl Backend {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Backend::Memory),
            "sqlite" => Some(Backend::Sqlite),
            "file" => Some(Backend::File),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    Uuid,
    Timestamp,
    Sequential,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Key the collection is stored under
    pub storage_key: String,
    pub backend: Backend,
    /// SQLite database file or file-store directory. `None` uses the
    /// backend's default under `./data`.
    pub data_path: Option<PathBuf>,
    /// Install the seed collection when nothing usable is stored
    pub seed_when_empty: bool,
    pub id_scheme: IdScheme,
    /// Rolling log directory; logging is left alone when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.into(),
            backend: Backend::Sqlite,
            data_path: None,
            seed_when_empty: true,
            id_scheme: IdScheme::Uuid,
            log_dir: None,
        }
    }
}

impl Settings {
    pub fn from_toml_str(raw: &str) -> Result<Self, SettingsError> {
        toml::from_str(raw).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Read `path` (when it exists), then apply environment overrides
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let mut settings = if path.exists() {
            Self::from_toml_str(&fs::read_to_string(path)?)?
        } else {
            log::info!("[Config] {} not found, using defaults", path.display());
            Self::default()
        };
        settings.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(settings)
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_STORAGE_KEY) {
            self.storage_key = v;
        }
        if let Some(v) = lookup(ENV_BACKEND) {
            self.backend =
                Backend::parse(&v).ok_or_else(|| SettingsError::Parse(format!("{}={} is not a backend", ENV_BACKEND, v)))?;
        }
        if let Some(v) = lookup(ENV_DATA_PATH) {
            self.data_path = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup(ENV_SEED) {
            self.seed_when_empty = match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(SettingsError::Parse(format!("{}={} is not a boolean", ENV_SEED, v))),
            };
        }
        if let Some(v) = lookup(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(v));
        }
        Ok(())
    }

    /// Data path for the configured backend, defaults filled in
    pub fn resolved_data_path(&self) -> PathBuf {
        match (&self.data_path, self.backend) {
            (Some(path), _) => path.clone(),
            (None, Backend::File) => PathBuf::from("data"),
            (None, _) => PathBuf::from("data").join("todo_lists.db"),
        }
    }

    /// Open the configured key-value backend
    pub fn open_store(&self) -> Result<Arc<dyn KeyValueStore>, SettingsError> {
        let store: Arc<dyn KeyValueStore> = match self.backend {
            Backend::Memory => Arc::new(MemoryStore::new()),
            Backend::Sqlite => {
                let path = self.resolved_data_path();
                if path.as_os_str() == ":memory:" {
                    Arc::new(SqliteStore::open_in_memory()?)
                } else {
                    Arc::new(SqliteStore::open(&path)?)
                }
            }
            Backend::File => Arc::new(FileStore::new(self.resolved_data_path())),
        };
        log::info!("[Config] opened {:?} store", self.backend);
        Ok(store)
    }

    pub fn gateway(&self) -> Result<CollectionGateway, SettingsError> {
        Ok(CollectionGateway::new(self.open_store()?, self.storage_key.clone()))
    }

    pub fn id_generator(&self) -> Box<dyn IdGenerator> {
        match self.id_scheme {
            IdScheme::Uuid => Box::new(UuidIds),
            IdScheme::Timestamp => Box::new(TimestampIds::new()),
            IdScheme::Sequential => Box::new(SequentialIds::new()),
        }
    }

    /// Install the rolling file logger when `log_dir` is set.
    /// Returns whether a logger was installed.
    pub fn init_logging(&self) -> Result<bool, SettingsError> {
        let Some(dir) = &self.log_dir else {
            return Ok(false);
        };
        rolling_logger::init_logger(dir, LOG_APP_NAME)?;
        log::info!("[Config] logging to {}", dir.display());
        Ok(true)
    }
}
