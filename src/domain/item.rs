//! Item Entity
//!
//! A checkable unit of work inside a list.

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// A todo item. Replaced as a whole value on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, stable for the item's lifetime
    pub id: String,
    /// Item text content (never edited after creation)
    pub text: String,
    /// Completion status
    pub completed: bool,
}

impl Item {
    /// Create a new, not yet completed item
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
        }
    }

    /// Copy of this item with `completed` flipped
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

impl Entity for Item {
    type Id = str;

    fn id(&self) -> &str {
        &self.id
    }
}
