//! Collection Store
//!
//! Snapshot transitions for lists and items.
//!
//! Every function takes the current snapshot by reference and returns
//! `Some(next)` when something changed, or `None` for a silent no-op
//! (blank title/text, unknown id). The input snapshot is never modified.

use crate::domain::{next_unique, Collection, IdGenerator, Item, TodoList};

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

// ========================
// List Operations
// ========================

/// Append a new empty list at the end
pub fn add_list(collection: &Collection, title: &str, ids: &mut dyn IdGenerator) -> Option<Collection> {
    if is_blank(title) {
        return None;
    }

    let id = next_unique(ids, |candidate| collection.position_of(candidate).is_some());
    let mut lists = collection.lists().to_vec();
    lists.push(TodoList::new(id, title));
    Some(Collection::from_lists(lists))
}

/// Remove a list and everything in it
pub fn delete_list(collection: &Collection, list_id: &str) -> Option<Collection> {
    collection.position_of(list_id)?;

    let lists = collection
        .lists()
        .iter()
        .filter(|list| list.id != list_id)
        .cloned()
        .collect();
    Some(Collection::from_lists(lists))
}

/// Empty the whole collection
pub fn clear(collection: &Collection) -> Option<Collection> {
    if collection.is_empty() {
        return None;
    }
    Some(Collection::new())
}

// ========================
// Item Operations
// ========================

/// Append a new, not completed item to the end of a list
pub fn add_item(
    collection: &Collection,
    list_id: &str,
    text: &str,
    ids: &mut dyn IdGenerator,
) -> Option<Collection> {
    if is_blank(text) {
        return None;
    }
    let index = collection.position_of(list_id)?;

    let id = next_unique(ids, |candidate| collection.contains_item_id(candidate));
    let mut lists = collection.lists().to_vec();
    lists[index].items.push(Item::new(id, text));
    Some(Collection::from_lists(lists))
}

/// Flip the completion flag of one item
pub fn toggle_item(collection: &Collection, list_id: &str, item_id: &str) -> Option<Collection> {
    let list_index = collection.position_of(list_id)?;
    let item_index = collection.lists()[list_index].position_of(item_id)?;

    let mut lists = collection.lists().to_vec();
    let item = &mut lists[list_index].items[item_index];
    *item = item.toggled();
    Some(Collection::from_lists(lists))
}

/// Remove one item from its list
pub fn delete_item(collection: &Collection, list_id: &str, item_id: &str) -> Option<Collection> {
    let list_index = collection.position_of(list_id)?;
    let item_index = collection.lists()[list_index].position_of(item_id)?;

    let mut lists = collection.lists().to_vec();
    lists[list_index].items.remove(item_index);
    Some(Collection::from_lists(lists))
}
