//! Id Generation
//!
//! Ids are produced by an injected generator so tests can predict them and
//! rapid successive creations never collide.

use uuid::Uuid;

/// Source of fresh entity ids
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> String;
}

/// Monotonic counter: "1", "2", "3", ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Unix-millisecond ids, bumped so two calls in the same tick still differ
#[derive(Debug, Clone, Default)]
pub struct TimestampIds {
    last: i64,
}

impl TimestampIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for TimestampIds {
    fn next_id(&mut self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        self.last.to_string()
    }
}

/// Draw ids until one is not `taken`.
///
/// Loaded data may already use ids a fresh generator would hand out
/// (the seed lists are "1" and "2"), so the first candidate is not trusted.
pub fn next_unique(ids: &mut dyn IdGenerator, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let candidate = ids.next_id();
        if !taken(&candidate) {
            return candidate;
        }
        log::debug!("id {} already in use, drawing another", candidate);
    }
}
