//! Reorder Engine
//!
//! Turns drag gestures into new snapshots. Two granularities share one
//! gesture shape (begin → over* → drop | cancel):
//!
//! - lists are reordered within the collection (`ListReorder`)
//! - items are reordered within a list or moved to another list (`ItemReorder`)
//!
//! The snapshot algorithms `move_list` and `move_item` are pure and usable
//! without a gesture. A move is always built as one complete new `Collection`,
//! so an item is never observable in two lists, or in none.

use list_dragdrop::{DragState, DropPreview, GestureEvent, GestureOutcome};

use crate::domain::Collection;

/// The item being dragged: where it lives and what it is
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub list_id: String,
    pub item_id: String,
}

impl ItemRef {
    pub fn new(list_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            list_id: list_id.into(),
            item_id: item_id.into(),
        }
    }
}

/// Where an item is dropped: before `item_id` in `list_id`, or at the end
/// of the list when `item_id` is `None` (the list's empty drop zone).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemTarget {
    pub list_id: String,
    pub item_id: Option<String>,
}

impl ItemTarget {
    /// Insert before an existing item
    pub fn before(list_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            list_id: list_id.into(),
            item_id: Some(item_id.into()),
        }
    }

    /// Append to the end of a list
    pub fn end_of(list_id: impl Into<String>) -> Self {
        Self {
            list_id: list_id.into(),
            item_id: None,
        }
    }
}

/// A target "is" the dragged item when it points at that item's own slot
impl PartialEq<ItemRef> for ItemTarget {
    fn eq(&self, other: &ItemRef) -> bool {
        self.list_id == other.list_id && self.item_id.as_deref() == Some(other.item_id.as_str())
    }
}

// ========================
// Snapshot algorithms
// ========================

/// Move the list `dragged_id` into the slot held by `target_id`.
///
/// One splice-out / splice-in: the dragged list is removed, then reinserted
/// at the target's pre-removal index, so every list in between shifts by one.
/// Returns `None` for a self-drop or when either id is unknown.
pub fn move_list(collection: &Collection, dragged_id: &str, target_id: &str) -> Option<Collection> {
    if dragged_id == target_id {
        return None;
    }
    let from = collection.position_of(dragged_id)?;
    let to = collection.position_of(target_id)?;

    let mut lists = collection.lists().to_vec();
    let dragged = lists.remove(from);
    lists.insert(to, dragged);
    Some(Collection::from_lists(lists))
}

/// Move an item to `target`, within its list or across lists.
///
/// The item is removed from its source list first; the insertion index is
/// then looked up in the post-removal target sequence, which keeps
/// forward moves inside one list from landing one slot too far.
///
/// Returns `None` (nothing changes) when the source item or target list is
/// missing, when the item is dropped on itself, when another list already
/// holds an item with the same id, or when the move would reproduce the
/// current order.
pub fn move_item(collection: &Collection, source: &ItemRef, target: &ItemTarget) -> Option<Collection> {
    if *target == *source {
        return None;
    }

    let source_list = collection.position_of(&source.list_id)?;
    let source_item = collection.lists()[source_list].position_of(&source.item_id)?;
    let target_list = collection.position_of(&target.list_id)?;

    if target_list != source_list && collection.lists()[target_list].item(&source.item_id).is_some() {
        log::warn!(
            "[DND] list {} already holds an item {}, drop ignored",
            target.list_id,
            source.item_id
        );
        return None;
    }

    let mut lists = collection.lists().to_vec();
    let item = lists[source_list].items.remove(source_item);

    let items = &mut lists[target_list].items;
    let insert_at = target
        .item_id
        .as_deref()
        .and_then(|id| items.iter().position(|candidate| candidate.id == id))
        .unwrap_or(items.len());
    items.insert(insert_at, item);

    let next = Collection::from_lists(lists);
    if next == *collection {
        return None;
    }
    Some(next)
}

// ========================
// Gesture engines
// ========================

/// List-level reorder gesture
#[derive(Debug, Default)]
pub struct ListReorder {
    dnd: DragState<String>,
}

impl ListReorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the dragged list. No snapshot change yet.
    pub fn begin(&mut self, list_id: impl Into<String>) {
        if let Some(previous) = self.dnd.begin(list_id.into()) {
            log::debug!("[DND] list drag of {} replaced by a new begin", previous);
        }
    }

    /// Hover feedback for the rendering layer
    pub fn over(&self, target_list_id: &str) -> Option<DropPreview<String, String>> {
        self.dnd.over(target_list_id.to_string())
    }

    /// Finish the gesture on `target_list_id`. Drag state is cleared whether
    /// or not anything moved.
    pub fn drop(&mut self, collection: &Collection, target_list_id: &str) -> Option<Collection> {
        let dragged = self.dnd.take()?;
        log::debug!("[DND] list drop: dragged={}, target={}", dragged, target_list_id);
        move_list(collection, &dragged, target_list_id)
    }

    pub fn cancel(&mut self) {
        self.dnd.cancel();
    }

    /// Currently dragged list, for dimming it while the gesture lasts
    pub fn dragging(&self) -> Option<&str> {
        self.dnd.dragging().map(String::as_str)
    }

    /// Feed a raw gesture event; returns the new snapshot when a drop committed
    pub fn apply(&mut self, collection: &Collection, event: GestureEvent<String, String>) -> Option<Collection> {
        match self.dnd.apply(event) {
            GestureOutcome::Dropped {
                dragged: Some(dragged),
                target,
            } => move_list(collection, &dragged, &target),
            _ => None,
        }
    }
}

/// Item-level reorder and cross-list transfer gesture
#[derive(Debug, Default)]
pub struct ItemReorder {
    dnd: DragState<ItemRef>,
}

impl ItemReorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, list_id: impl Into<String>, item_id: impl Into<String>) {
        if let Some(previous) = self.dnd.begin(ItemRef::new(list_id, item_id)) {
            log::debug!(
                "[DND] item drag of {}/{} replaced by a new begin",
                previous.list_id,
                previous.item_id
            );
        }
    }

    pub fn over(&self, target: ItemTarget) -> Option<DropPreview<ItemRef, ItemTarget>> {
        self.dnd.over(target)
    }

    /// Finish the gesture on `target`. Drag state is cleared unconditionally.
    pub fn drop(&mut self, collection: &Collection, target: &ItemTarget) -> Option<Collection> {
        let dragged = self.dnd.take()?;
        log::debug!(
            "[DND] item drop: dragged={}/{}, target={}/{:?}",
            dragged.list_id,
            dragged.item_id,
            target.list_id,
            target.item_id
        );
        move_item(collection, &dragged, target)
    }

    pub fn cancel(&mut self) {
        self.dnd.cancel();
    }

    pub fn dragging(&self) -> Option<&ItemRef> {
        self.dnd.dragging()
    }

    pub fn apply(
        &mut self,
        collection: &Collection,
        event: GestureEvent<ItemRef, ItemTarget>,
    ) -> Option<Collection> {
        match self.dnd.apply(event) {
            GestureOutcome::Dropped {
                dragged: Some(dragged),
                target,
            } => move_item(collection, &dragged, &target),
            _ => None,
        }
    }
}
