//! List DragDrop Utilities
//!
//! Drag-and-drop gesture state that knows nothing about the UI toolkit.
//! A gesture is `begin`, then zero or more `over`, then a terminal `drop` or `cancel`.
//! The state only remembers what is being dragged; what a drop *does* is up to the caller.

/// Advisory preview produced while hovering a target during a drag
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropPreview<K, T> {
    pub dragged: K,
    pub target: T,
}

/// The three abstract events a gesture-capture layer feeds in (plus cancel)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GestureEvent<K, T> {
    Begin(K),
    Over(T),
    Drop(T),
    Cancel,
}

/// What happened to the gesture state after an event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GestureOutcome<K, T> {
    /// A drag started. `replaced` holds the previous dragged key when a begin overrode it.
    Started { replaced: Option<K> },
    /// Hover feedback. `None` when idle or hovering the dragged entity itself.
    Preview(Option<DropPreview<K, T>>),
    /// Terminal drop. `dragged` is `None` when nothing was being dragged.
    Dropped { dragged: Option<K>, target: T },
    /// Terminal cancel; nothing was applied.
    Cancelled { dragged: Option<K> },
}

/// Per-gesture drag state
///
/// Holds at most one dragged key. Every terminal event clears it, so state
/// never leaks from one gesture into the next.
#[derive(Clone, Debug)]
pub struct DragState<K> {
    dragging: Option<K>,
}

impl<K> Default for DragState<K> {
    fn default() -> Self {
        Self { dragging: None }
    }
}

impl<K: Clone + PartialEq> DragState<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging `key`. A begin while already dragging overwrites the
    /// previous key (last begin wins); the overwritten key is returned.
    pub fn begin(&mut self, key: K) -> Option<K> {
        self.dragging.replace(key)
    }

    pub fn dragging(&self) -> Option<&K> {
        self.dragging.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// Whether `key` is the entity currently being dragged (for dimming it)
    pub fn is_dragged(&self, key: &K) -> bool {
        self.dragging.as_ref() == Some(key)
    }

    /// Hover over `target`. Never changes state.
    ///
    /// Returns no preview when idle, or when the target is the dragged entity.
    pub fn over<T: PartialEq<K>>(&self, target: T) -> Option<DropPreview<K, T>> {
        let dragged = self.dragging.as_ref()?;
        if target == *dragged {
            return None;
        }
        Some(DropPreview {
            dragged: dragged.clone(),
            target,
        })
    }

    /// End the gesture with a drop, handing back the dragged key.
    pub fn take(&mut self) -> Option<K> {
        self.dragging.take()
    }

    /// End the gesture without a drop.
    pub fn cancel(&mut self) -> Option<K> {
        self.dragging.take()
    }

    /// Feed one gesture event through the state machine
    pub fn apply<T: PartialEq<K>>(&mut self, event: GestureEvent<K, T>) -> GestureOutcome<K, T> {
        match event {
            GestureEvent::Begin(key) => GestureOutcome::Started {
                replaced: self.begin(key),
            },
            GestureEvent::Over(target) => GestureOutcome::Preview(self.over(target)),
            GestureEvent::Drop(target) => GestureOutcome::Dropped {
                dragged: self.take(),
                target,
            },
            GestureEvent::Cancel => GestureOutcome::Cancelled {
                dragged: self.cancel(),
            },
        }
    }
}
