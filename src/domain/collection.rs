//! Collection Aggregate
//!
//! The ordered set of lists owned by one session. A `Collection` value is an
//! immutable snapshot: changes go through `store` / `reorder`, which build a
//! new value and leave the old one untouched.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::entity::{find_index, DomainError, DomainResult};
use super::item::Item;
use super::list::TodoList;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    lists: Vec<TodoList>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lists(lists: Vec<TodoList>) -> Self {
        Self { lists }
    }

    /// Deterministic starter data installed when storage holds nothing usable
    pub fn seed() -> Self {
        let done = |item: Item| Item {
            completed: true,
            ..item
        };

        Self::from_lists(vec![
            TodoList::new("1", "Work Tasks").with_items(vec![
                Item::new("1", "Review project proposal"),
                done(Item::new("2", "Update documentation")),
                Item::new("3", "Prepare presentation"),
            ]),
            TodoList::new("2", "Personal").with_items(vec![
                Item::new("4", "Buy groceries"),
                Item::new("5", "Call dentist"),
                done(Item::new("6", "Exercise")),
            ]),
        ])
    }

    pub fn lists(&self) -> &[TodoList] {
        &self.lists
    }

    pub fn list(&self, list_id: &str) -> Option<&TodoList> {
        self.lists.iter().find(|list| list.id == list_id)
    }

    pub fn position_of(&self, list_id: &str) -> Option<usize> {
        find_index(&self.lists, list_id)
    }

    pub fn item(&self, list_id: &str, item_id: &str) -> Option<&Item> {
        self.list(list_id)?.item(item_id)
    }

    /// Whether any list already holds an item with this id
    pub fn contains_item_id(&self, item_id: &str) -> bool {
        self.lists.iter().any(|list| list.item(item_id).is_some())
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Total items across all lists
    pub fn item_count(&self) -> usize {
        self.lists.iter().map(TodoList::len).sum()
    }

    pub fn completed_count(&self) -> usize {
        self.lists.iter().map(TodoList::completed_count).sum()
    }

    /// List ids in order
    pub fn list_ids(&self) -> Vec<&str> {
        self.lists.iter().map(|list| list.id.as_str()).collect()
    }

    /// Check the structural invariants a persisted value must satisfy:
    /// unique list ids, and item ids unique within each list.
    pub fn validate(&self) -> DomainResult<()> {
        let mut list_ids = HashSet::new();

        for list in &self.lists {
            if !list_ids.insert(list.id.as_str()) {
                return Err(DomainError::Conflict(format!("duplicate list id {}", list.id)));
            }
            let mut item_ids = HashSet::new();
            for item in &list.items {
                if !item_ids.insert(item.id.as_str()) {
                    return Err(DomainError::Conflict(format!(
                        "duplicate item id {} in list {}",
                        item.id, list.id
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_shape() {
        let seed = Collection::seed();

        assert_eq!(seed.list_ids(), vec!["1", "2"]);
        assert_eq!(seed.lists()[0].title, "Work Tasks");
        assert_eq!(seed.item_count(), 6);
        assert_eq!(seed.completed_count(), 2);
        assert!(seed.item("1", "2").unwrap().completed);
        assert!(seed.validate().is_ok());
    }

    #[test]
    fn test_seed_is_deterministic() {
        assert_eq!(Collection::seed(), Collection::seed());
    }

    #[test]
    fn test_serializes_as_bare_array() {
        let json = serde_json::to_string(&Collection::from_lists(vec![TodoList::new("a", "A")])).unwrap();
        assert_eq!(json, r#"[{"id":"a","title":"A","todos":[]}]"#);
    }

    #[test]
    fn test_validate_rejects_duplicate_list_ids() {
        let c = Collection::from_lists(vec![TodoList::new("a", "A"), TodoList::new("a", "B")]);
        assert!(matches!(c.validate(), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_item_ids_in_one_list() {
        let c = Collection::from_lists(vec![
            TodoList::new("a", "A").with_items(vec![Item::new("x", "one"), Item::new("x", "two")]),
        ]);
        assert!(matches!(c.validate(), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn test_validate_accepts_same_item_id_in_different_lists() {
        let c = Collection::from_lists(vec![
            TodoList::new("a", "A").with_items(vec![Item::new("x", "one")]),
            TodoList::new("b", "B").with_items(vec![Item::new("x", "two")]),
        ]);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_empty_ids() {
        let c = Collection::from_lists(vec![TodoList::new("", "A").with_items(vec![Item::new("", "blank id")])]);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_lookups() {
        let seed = Collection::seed();

        assert_eq!(seed.position_of("2"), Some(1));
        assert!(seed.contains_item_id("5"));
        assert!(!seed.contains_item_id("99"));
        assert!(seed.item("2", "1").is_none());
    }
}
