//! Session Controller
//!
//! Owns the current snapshot for one session. Loads it once at startup,
//! routes user actions and drag gestures to the store and reorder engines,
//! publishes every committed snapshot and saves it in the background.

use std::sync::Arc;

use list_dragdrop::{DropPreview, GestureEvent};
use tokio::sync::watch;

use crate::config::{Settings, SettingsError};
use crate::domain::{Collection, IdGenerator};
use crate::reorder::{ItemRef, ItemReorder, ItemTarget, ListReorder};
use crate::repository::{CollectionGateway, LoadOutcome};
use crate::store;

use super::state::{LoadSource, SessionError, SessionResult, SessionState};
use super::writer::SnapshotWriter;

/// Prompt shown before wiping every list
pub const CLEAR_ALL_PROMPT: &str =
    "Are you sure you want to clear all todo lists? This action cannot be undone.";

/// Asks the user to confirm a destructive action
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub struct SessionController {
    state: SessionState,
    current: Arc<Collection>,
    ids: Box<dyn IdGenerator>,
    seed_when_empty: bool,
    lists: ListReorder,
    items: ItemReorder,
    writer: SnapshotWriter,
    updates: watch::Sender<Arc<Collection>>,
    last_load_issue: Option<String>,
    load_source: Option<LoadSource>,
}

impl SessionController {
    pub fn new(gateway: CollectionGateway, ids: Box<dyn IdGenerator>) -> Self {
        let current = Arc::new(Collection::new());
        let (updates, _) = watch::channel(current.clone());
        Self {
            state: SessionState::Uninitialized,
            current,
            ids,
            seed_when_empty: true,
            lists: ListReorder::new(),
            items: ItemReorder::new(),
            writer: SnapshotWriter::new(gateway),
            updates,
            last_load_issue: None,
            load_source: None,
        }
    }

    /// Install the seed collection (true) or an empty one (false) when
    /// nothing usable is stored
    pub fn with_seed(mut self, seed_when_empty: bool) -> Self {
        self.seed_when_empty = seed_when_empty;
        self
    }

    /// Build a controller over the backend, key and id scheme in `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let gateway = settings.gateway()?;
        Ok(Self::new(gateway, settings.id_generator()).with_seed(settings.seed_when_empty))
    }

    // ========================
    // Lifecycle
    // ========================

    /// Load the stored collection and become Ready.
    ///
    /// Missing or unusable data falls back to the seed (or an empty collection)
    /// and is written back. Loading never fails; the reason for a fallback is
    /// kept in `last_load_issue`.
    pub async fn start(&mut self) -> LoadSource {
        if let Some(source) = self.load_source {
            log::warn!("[Session] start called while {}", self.state);
            return source;
        }
        self.state = SessionState::Loading;

        let outcome = self.writer.gateway().load().await;
        let (collection, source) = match outcome {
            LoadOutcome::Found(collection) => (collection, LoadSource::Stored),
            LoadOutcome::NotFound => {
                self.last_load_issue = Some(format!("no value under {}", self.writer.gateway().key()));
                self.fallback()
            }
            LoadOutcome::Failed(e) => {
                log::warn!("[Session] stored collection unusable: {}", e);
                self.last_load_issue = Some(e.to_string());
                self.fallback()
            }
        };

        self.current = Arc::new(collection);
        self.updates.send_replace(self.current.clone());
        self.state = SessionState::Ready;
        self.load_source = Some(source);

        if source != LoadSource::Stored {
            self.writer.save(self.current.clone());
        }
        log::info!(
            "[Session] ready with {} lists ({:?})",
            self.current.len(),
            source
        );
        source
    }

    fn fallback(&self) -> (Collection, LoadSource) {
        if self.seed_when_empty {
            (Collection::seed(), LoadSource::Seeded)
        } else {
            (Collection::new(), LoadSource::Empty)
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<Collection> {
        self.current.clone()
    }

    /// Receive every committed snapshot
    pub fn subscribe(&self) -> watch::Receiver<Arc<Collection>> {
        self.updates.subscribe()
    }

    /// Where the startup collection came from; `None` before `start`
    pub fn load_source(&self) -> Option<LoadSource> {
        self.load_source
    }

    /// Why the last startup fell back to seed/empty data, if it did
    pub fn last_load_issue(&self) -> Option<&str> {
        self.last_load_issue.as_deref()
    }

    /// Wait for background saves to reach the store
    pub async fn flush(&mut self) {
        self.writer.flush().await;
    }

    /// Number of background saves still running
    pub fn pending_saves(&self) -> usize {
        self.writer.pending()
    }

    fn ensure_ready(&self) -> SessionResult<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(SessionError::NotReady { state: self.state })
        }
    }

    fn commit(&mut self, next: Option<Collection>) -> bool {
        let Some(next) = next else {
            return false;
        };
        self.current = Arc::new(next);
        self.updates.send_replace(self.current.clone());
        self.writer.save(self.current.clone());
        true
    }

    // ========================
    // Lists and items
    // ========================

    pub fn add_list(&mut self, title: &str) -> SessionResult<bool> {
        self.ensure_ready()?;
        let next = store::add_list(&self.current, title, self.ids.as_mut());
        Ok(self.commit(next))
    }

    pub fn delete_list(&mut self, list_id: &str) -> SessionResult<bool> {
        self.ensure_ready()?;
        let next = store::delete_list(&self.current, list_id);
        Ok(self.commit(next))
    }

    pub fn add_item(&mut self, list_id: &str, text: &str) -> SessionResult<bool> {
        self.ensure_ready()?;
        let next = store::add_item(&self.current, list_id, text, self.ids.as_mut());
        Ok(self.commit(next))
    }

    pub fn toggle_item(&mut self, list_id: &str, item_id: &str) -> SessionResult<bool> {
        self.ensure_ready()?;
        let next = store::toggle_item(&self.current, list_id, item_id);
        Ok(self.commit(next))
    }

    pub fn delete_item(&mut self, list_id: &str, item_id: &str) -> SessionResult<bool> {
        self.ensure_ready()?;
        let next = store::delete_item(&self.current, list_id, item_id);
        Ok(self.commit(next))
    }

    /// Wipe every list after the user confirms. The storage key is removed
    /// before returning; a failed removal is logged and memory is still cleared.
    pub async fn clear_all(&mut self, confirm: &dyn Confirm) -> SessionResult<bool> {
        self.ensure_ready()?;
        if !confirm.confirm(CLEAR_ALL_PROMPT) {
            log::info!("[Session] clear all declined");
            return Ok(false);
        }

        self.lists.cancel();
        self.items.cancel();
        self.current = Arc::new(Collection::new());
        self.updates.send_replace(self.current.clone());

        if let Err(e) = self.writer.clear().await {
            log::error!("[Session] failed to remove stored collection: {}", e);
        }
        log::info!("[Session] cleared all lists");
        Ok(true)
    }

    // ========================
    // List drag and drop
    // ========================

    pub fn begin_list_drag(&mut self, list_id: &str) -> SessionResult<()> {
        self.ensure_ready()?;
        self.lists.begin(list_id);
        Ok(())
    }

    pub fn list_drag_over(&self, target_list_id: &str) -> Option<DropPreview<String, String>> {
        self.lists.over(target_list_id)
    }

    pub fn drop_list(&mut self, target_list_id: &str) -> SessionResult<bool> {
        self.ensure_ready()?;
        let next = self.lists.drop(&self.current, target_list_id);
        Ok(self.commit(next))
    }

    pub fn cancel_list_drag(&mut self) {
        self.lists.cancel();
    }

    pub fn dragged_list(&self) -> Option<&str> {
        self.lists.dragging()
    }

    /// Feed a raw list gesture event
    pub fn handle_list_gesture(&mut self, event: GestureEvent<String, String>) -> SessionResult<bool> {
        self.ensure_ready()?;
        let next = self.lists.apply(&self.current, event);
        Ok(self.commit(next))
    }

    // ========================
    // Item drag and drop
    // ========================

    pub fn begin_item_drag(&mut self, list_id: &str, item_id: &str) -> SessionResult<()> {
        self.ensure_ready()?;
        self.items.begin(list_id, item_id);
        Ok(())
    }

    pub fn item_drag_over(&self, target: ItemTarget) -> Option<DropPreview<ItemRef, ItemTarget>> {
        self.items.over(target)
    }

    pub fn drop_item(&mut self, target: &ItemTarget) -> SessionResult<bool> {
        self.ensure_ready()?;
        let next = self.items.drop(&self.current, target);
        Ok(self.commit(next))
    }

    pub fn cancel_item_drag(&mut self) {
        self.items.cancel();
    }

    pub fn dragged_item(&self) -> Option<&ItemRef> {
        self.items.dragging()
    }

    /// Feed a raw item gesture event
    pub fn handle_item_gesture(&mut self, event: GestureEvent<ItemRef, ItemTarget>) -> SessionResult<bool> {
        self.ensure_ready()?;
        let next = self.items.apply(&self.current, event);
        Ok(self.commit(next))
    }
}
