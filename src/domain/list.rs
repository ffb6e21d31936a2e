//! TodoList Entity
//!
//! A titled, ordered sequence of items. Position in `items` is the only ranking.

use serde::{Deserialize, Serialize};

use super::entity::{find_index, Entity};
use super::item::Item;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    /// Unique identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Owned items, in display order. Persisted as `todos`.
    #[serde(rename = "todos")]
    pub items: Vec<Item>,
}

impl TodoList {
    /// Create an empty list
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            items: Vec::new(),
        }
    }

    /// Builder-style helper used by seed data and tests
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn position_of(&self, item_id: &str) -> Option<usize> {
        find_index(&self.items, item_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }

    /// Item ids in order
    pub fn item_ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.id.as_str()).collect()
    }
}

impl Entity for TodoList {
    type Id = str;

    fn id(&self) -> &str {
        &self.id
    }
}
