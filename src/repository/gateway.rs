//! Collection Gateway
//!
//! Serializes the whole `Collection` as one JSON document under a fixed key.

use std::sync::Arc;

use crate::domain::Collection;

use super::traits::{KeyValueStore, PersistenceError, StorageResult};

/// Key the collection is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "todoLists";

/// Result of reading the stored collection
#[derive(Debug)]
pub enum LoadOutcome {
    Found(Collection),
    NotFound,
    Failed(PersistenceError),
}

impl LoadOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LoadOutcome::Found(_))
    }

    /// The loaded collection, if any
    pub fn into_collection(self) -> Option<Collection> {
        match self {
            LoadOutcome::Found(collection) => Some(collection),
            _ => None,
        }
    }
}

/// Serialize a collection to its stored JSON form
pub fn encode(collection: &Collection) -> StorageResult<String> {
    Ok(serde_json::to_string(collection)?)
}

/// Parse and validate a stored value. Anything that does not parse or breaks
/// an id invariant is reported as `Malformed`.
pub fn decode(raw: &str) -> StorageResult<Collection> {
    let collection: Collection =
        serde_json::from_str(raw).map_err(|e| PersistenceError::Malformed(e.to_string()))?;
    collection
        .validate()
        .map_err(|e| PersistenceError::Malformed(e.to_string()))?;
    Ok(collection)
}

/// Load/save/clear access to the persisted collection
#[derive(Clone)]
pub struct CollectionGateway {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl CollectionGateway {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn with_default_key(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored collection. Never errors: read failures and bad data
    /// come back as `LoadOutcome::Failed`.
    pub async fn load(&self) -> LoadOutcome {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("[Gateway] no value under {}", self.key);
                return LoadOutcome::NotFound;
            }
            Err(e) => {
                log::error!("[Gateway] failed to read {}: {}", self.key, e);
                return LoadOutcome::Failed(e);
            }
        };

        match decode(&raw) {
            Ok(collection) => {
                log::info!(
                    "[Gateway] loaded {} lists, {} items from {}",
                    collection.len(),
                    collection.item_count(),
                    self.key
                );
                LoadOutcome::Found(collection)
            }
            Err(e) => {
                log::warn!("[Gateway] discarding value under {}: {}", self.key, e);
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Overwrite the stored value with `collection`
    pub async fn save(&self, collection: &Collection) -> StorageResult<()> {
        let raw = encode(collection)?;
        self.store.set(&self.key, &raw).await?;
        log::debug!("[Gateway] saved {} bytes to {}", raw.len(), self.key);
        Ok(())
    }

    /// Remove the stored value entirely
    pub async fn clear(&self) -> StorageResult<()> {
        self.store.remove(&self.key).await?;
        log::info!("[Gateway] removed {}", self.key);
        Ok(())
    }
}
