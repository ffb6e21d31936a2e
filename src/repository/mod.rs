//! Repository Layer
//!
//! Key-value storage backends and the gateway that persists a whole
//! `Collection` under one fixed key.

mod file;
mod gateway;
mod memory;
mod sqlite;
mod traits;


pub use file::FileStore;
pub use gateway::{decode, encode, CollectionGateway, LoadOutcome, DEFAULT_STORAGE_KEY};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{KeyValueStore, PersistenceError, StorageResult};
