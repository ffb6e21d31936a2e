//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO storage or runtime dependencies.

mod collection;
mod entity;
mod id_gen;
mod item;
mod list;

pub use collection::Collection;
pub use entity::{find_index, DomainError, DomainResult, Entity};
pub use id_gen::{next_unique, IdGenerator, SequentialIds, TimestampIds, UuidIds};
pub use item::Item;
pub use list::TodoList;
