//! Todo Lists
//!
//! Layered architecture:
//! - domain: Items, lists, the collection and id generation
//! - store: Snapshot transitions for list and item actions
//! - reorder: Drag-and-drop reordering of lists and items
//! - repository: Key-value backends and the collection gateway
//! - session: Startup load, actions and background persistence
//! - config: Settings from TOML and the environment

pub mod config;
pub mod domain;
pub mod reorder;
pub mod repository;
pub mod session;
pub mod store;

pub use config::{Settings, SettingsError};
pub use domain::{Collection, Item, TodoList};
pub use reorder::{ItemRef, ItemTarget};
pub use session::{Confirm, LoadSource, SessionController, SessionError, SessionState};
