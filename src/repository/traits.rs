//! Repository Layer - Core Traits
//!
//! Defines the abstract key-value interface the gateway writes through.
//! Implementations can use SQLite, plain files, in-memory maps, etc.

use async_trait::async_trait;
use thiserror::Error;

/// Common result type for storage operations
pub type StorageResult<T> = Result<T, PersistenceError>;

/// Storage-level errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Malformed data: {0}")]
    Malformed(String),
    #[error("Quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
}

/// Minimal string key-value store
///
/// All operations are async to support various backends.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`; `None` when absent
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Insert or overwrite the value under `key`
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> StorageResult<()>;
}
