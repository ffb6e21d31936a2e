//! Session Integration Tests
//!
//! Controller behavior over an in-memory store.

#[cfg(test)]
mod tests {
    use crate::domain::{Collection, Item, SequentialIds, TodoList};
    use crate::reorder::{ItemRef, ItemTarget};
    use crate::repository::{decode, encode, CollectionGateway, MemoryStore, DEFAULT_STORAGE_KEY};
    use crate::session::{LoadSource, SessionController, SessionError, SessionState, CLEAR_ALL_PROMPT};
    use list_dragdrop::GestureEvent;
    use std::cell::RefCell;
    use std::sync::Arc;

    fn controller(store: Arc<MemoryStore>) -> SessionController {
        SessionController::new(CollectionGateway::with_default_key(store), Box::new(SequentialIds::starting_at(100)))
    }

    async fn stored(store: &MemoryStore) -> Option<Collection> {
        let raw = store.raw(DEFAULT_STORAGE_KEY).await?;
        Some(decode(&raw).expect("stored value should decode"))
    }

    fn two_lists() -> Collection {
        Collection::from_lists(vec![
            TodoList::new("L1", "One").with_items(vec![Item::new("x", "X"), Item::new("y", "Y")]),
            TodoList::new("L2", "Two").with_items(vec![Item::new("p", "P"), Item::new("q", "Q")]),
            TodoList::new("L3", "Three"),
        ])
    }

    async fn ready_with(collection: &Collection) -> (SessionController, Arc<MemoryStore>) {
        let raw = encode(collection).unwrap();
        let store = Arc::new(MemoryStore::new().with_entry(DEFAULT_STORAGE_KEY, &raw));
        let mut session = controller(store.clone());
        assert_eq!(session.start().await, LoadSource::Stored);
        (session, store)
    }

    #[tokio::test]
    async fn test_rejects_mutations_before_start() {
        let mut session = controller(Arc::new(MemoryStore::new()));

        assert_eq!(session.state(), SessionState::Uninitialized);
        assert_eq!(
            session.add_list("Early"),
            Err(SessionError::NotReady {
                state: SessionState::Uninitialized
            })
        );
        assert!(session.begin_list_drag("1").is_err());
        assert!(session.clear_all(&|_: &str| true).await.is_err());
        assert!(session.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_missing_data_installs_and_persists_seed() {
        let store = Arc::new(MemoryStore::new());
        let mut session = controller(store.clone());

        assert_eq!(session.start().await, LoadSource::Seeded);
        assert!(session.is_ready());
        assert_eq!(*session.snapshot(), Collection::seed());
        assert!(session.last_load_issue().is_some());

        session.flush().await;
        assert_eq!(stored(&store).await, Some(Collection::seed()));
    }

    #[tokio::test]
    async fn test_malformed_data_installs_seed() {
        let store = Arc::new(MemoryStore::new().with_entry(DEFAULT_STORAGE_KEY, "[{\"id\":1}]"));
        let mut session = controller(store.clone());

        assert_eq!(session.start().await, LoadSource::Seeded);
        assert_eq!(*session.snapshot(), Collection::seed());
        assert!(session.last_load_issue().unwrap().contains("Malformed"));
    }

    #[tokio::test]
    async fn test_shared_item_ids_across_lists_are_kept() {
        let collection = Collection::from_lists(vec![
            TodoList::new("L1", "One").with_items(vec![Item::new("x", "X in one")]),
            TodoList::new("L2", "Two").with_items(vec![Item::new("x", "X in two")]),
        ]);
        let (mut session, store) = ready_with(&collection).await;

        assert_eq!(*session.snapshot(), collection);
        assert_eq!(session.last_load_issue(), None);

        session.begin_item_drag("L1", "x").unwrap();
        assert!(!session.drop_item(&ItemTarget::end_of("L2")).unwrap());
        session.flush().await;
        assert_eq!(stored(&store).await, Some(collection));
    }

    #[tokio::test]
    async fn test_unreadable_store_installs_seed() {
        let store = Arc::new(MemoryStore::new().with_entry(DEFAULT_STORAGE_KEY, "[]"));
        store.set_fail_reads(true);
        let mut session = controller(store);

        assert_eq!(session.start().await, LoadSource::Seeded);
    }

    #[tokio::test]
    async fn test_second_start_reports_first_source() {
        let store = Arc::new(MemoryStore::new());
        let mut session = controller(store);
        assert_eq!(session.load_source(), None);

        assert_eq!(session.start().await, LoadSource::Seeded);
        session.add_list("Kept").unwrap();
        assert_eq!(session.start().await, LoadSource::Seeded);

        assert_eq!(session.load_source(), Some(LoadSource::Seeded));
        assert_eq!(session.snapshot().len(), 3);
        session.flush().await;
    }

    #[tokio::test]
    async fn test_seed_disabled_installs_empty() {
        let mut session = controller(Arc::new(MemoryStore::new())).with_seed(false);

        assert_eq!(session.start().await, LoadSource::Empty);
        assert!(session.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_stored_data_is_loaded_not_rewritten() {
        let (mut session, _store) = ready_with(&two_lists()).await;

        assert_eq!(*session.snapshot(), two_lists());
        assert_eq!(session.last_load_issue(), None);
        assert_eq!(session.pending_saves(), 0);
        session.flush().await;
    }

    #[tokio::test]
    async fn test_list_reorder_scenario() {
        let collection = Collection::from_lists(vec![
            TodoList::new("A", "A"),
            TodoList::new("B", "B"),
            TodoList::new("C", "C"),
        ]);
        let (mut session, store) = ready_with(&collection).await;

        session.begin_list_drag("B").unwrap();
        assert_eq!(session.dragged_list(), Some("B"));
        assert!(session.list_drag_over("A").is_some());
        assert!(session.drop_list("A").unwrap());

        assert_eq!(session.snapshot().list_ids(), vec!["B", "A", "C"]);
        assert_eq!(session.dragged_list(), None);

        session.flush().await;
        assert_eq!(stored(&store).await.unwrap().list_ids(), vec!["B", "A", "C"]);
    }

    #[tokio::test]
    async fn test_cross_list_transfer_scenario() {
        let (mut session, store) = ready_with(&two_lists()).await;

        session.begin_item_drag("L1", "y").unwrap();
        assert_eq!(session.dragged_item(), Some(&ItemRef::new("L1", "y")));
        assert!(session.drop_item(&ItemTarget::before("L2", "q")).unwrap());

        let snapshot = session.snapshot();
        assert_eq!(snapshot.list("L1").unwrap().item_ids(), vec!["x"]);
        assert_eq!(snapshot.list("L2").unwrap().item_ids(), vec!["p", "y", "q"]);
        assert_eq!(snapshot.item_count(), 4);
        assert_eq!(session.dragged_item(), None);

        session.flush().await;
        assert_eq!(stored(&store).await.as_ref(), Some(&*snapshot));
    }

    #[tokio::test]
    async fn test_drop_on_empty_list_scenario() {
        let (mut session, _store) = ready_with(&two_lists()).await;

        session.begin_item_drag("L1", "x").unwrap();
        assert!(session.drop_item(&ItemTarget::end_of("L3")).unwrap());

        assert_eq!(session.snapshot().list("L3").unwrap().item_ids(), vec!["x"]);
        assert_eq!(session.snapshot().list("L1").unwrap().item_ids(), vec!["y"]);
        session.flush().await;
    }

    #[tokio::test]
    async fn test_self_drops_and_cancel_change_nothing() {
        let (mut session, _store) = ready_with(&two_lists()).await;
        let before = session.snapshot();

        session.begin_list_drag("L1").unwrap();
        assert!(session.list_drag_over("L1").is_none());
        assert!(!session.drop_list("L1").unwrap());

        session.begin_item_drag("L2", "p").unwrap();
        assert!(!session.drop_item(&ItemTarget::before("L2", "p")).unwrap());

        session.begin_item_drag("L2", "p").unwrap();
        session.cancel_item_drag();
        assert!(!session.drop_item(&ItemTarget::end_of("L1")).unwrap());

        assert!(Arc::ptr_eq(&before, &session.snapshot()));
        assert_eq!(session.pending_saves(), 0);
    }

    #[tokio::test]
    async fn test_last_begin_wins() {
        let (mut session, _store) = ready_with(&two_lists()).await;

        session.begin_item_drag("L1", "x").unwrap();
        session.begin_item_drag("L2", "q").unwrap();
        assert!(session.drop_item(&ItemTarget::before("L1", "x")).unwrap());

        let snapshot = session.snapshot();
        assert_eq!(snapshot.list("L1").unwrap().item_ids(), vec!["q", "x", "y"]);
        assert_eq!(snapshot.list("L2").unwrap().item_ids(), vec!["p"]);
        session.flush().await;
    }

    #[tokio::test]
    async fn test_gesture_events() {
        let (mut session, _store) = ready_with(&two_lists()).await;

        assert!(!session.handle_list_gesture(GestureEvent::Begin("L3".to_string())).unwrap());
        assert!(!session.handle_list_gesture(GestureEvent::Over("L1".to_string())).unwrap());
        assert!(session.handle_list_gesture(GestureEvent::Drop("L1".to_string())).unwrap());
        assert_eq!(session.snapshot().list_ids(), vec!["L3", "L1", "L2"]);

        session
            .handle_item_gesture(GestureEvent::Begin(ItemRef::new("L2", "p")))
            .unwrap();
        assert!(!session.handle_item_gesture(GestureEvent::Cancel).unwrap());
        assert!(!session
            .handle_item_gesture(GestureEvent::Drop(ItemTarget::end_of("L3")))
            .unwrap());
        session.flush().await;
    }

    #[tokio::test]
    async fn test_item_actions_commit_and_persist() {
        let store = Arc::new(MemoryStore::new());
        let mut session = controller(store.clone());
        session.start().await;

        assert!(session.add_list("Errands").unwrap());
        let list_id = session.snapshot().lists().last().unwrap().id.clone();
        assert!(session.add_item(&list_id, "Post office").unwrap());
        assert!(!session.add_item(&list_id, "   ").unwrap());
        assert!(!session.add_list("").unwrap());

        let item_id = session.snapshot().list(&list_id).unwrap().items[0].id.clone();
        assert!(session.toggle_item(&list_id, &item_id).unwrap());
        assert!(session.snapshot().item(&list_id, &item_id).unwrap().completed);

        assert!(session.delete_item("1", "1").unwrap());
        assert!(!session.delete_item("1", "1").unwrap());
        assert!(session.delete_list("2").unwrap());
        assert!(!session.toggle_item("2", "4").unwrap());

        session.flush().await;
        assert_eq!(stored(&store).await.as_ref(), Some(&*session.snapshot()));
    }

    #[tokio::test]
    async fn test_new_ids_are_unique_across_lists() {
        let store = Arc::new(MemoryStore::new());
        let mut session =
            SessionController::new(CollectionGateway::with_default_key(store), Box::new(SequentialIds::new()));
        session.start().await;

        session.add_item("2", "First").unwrap();
        session.add_item("1", "Second").unwrap();

        let snapshot = session.snapshot();
        assert!(snapshot.validate().is_ok());
        assert_eq!(snapshot.list("2").unwrap().items.last().unwrap().id, "7");
        assert_eq!(snapshot.list("1").unwrap().items.last().unwrap().id, "8");
        session.flush().await;
    }

    #[tokio::test]
    async fn test_subscribers_see_commits() {
        let (mut session, _store) = ready_with(&two_lists()).await;
        let mut updates = session.subscribe();

        session.toggle_item("L1", "x").unwrap();
        assert!(updates.has_changed().unwrap());
        assert!(updates.borrow_and_update().item("L1", "x").unwrap().completed);

        session.toggle_item("L1", "missing").unwrap();
        assert!(!updates.has_changed().unwrap());
        session.flush().await;
    }

    #[tokio::test]
    async fn test_save_failure_keeps_memory() {
        let store = Arc::new(MemoryStore::with_quota(64));
        let mut session = controller(store.clone()).with_seed(false);
        session.start().await;
        session.flush().await;

        assert!(session.add_list("A list title long enough to blow the tiny quota").unwrap());
        session.flush().await;

        assert_eq!(session.snapshot().len(), 1);
        assert_eq!(stored(&store).await, Some(Collection::new()));
    }

    #[tokio::test]
    async fn test_reload_reproduces_settled_state() {
        let store = Arc::new(MemoryStore::new());
        let mut session = controller(store.clone());
        session.start().await;

        session.add_list("Later").unwrap();
        session.begin_list_drag("2").unwrap();
        session.drop_list("1").unwrap();
        session.begin_item_drag("2", "5").unwrap();
        session.drop_item(&ItemTarget::before("1", "1")).unwrap();
        session.toggle_item("1", "5").unwrap();
        session.flush().await;

        let mut reloaded = controller(store);
        assert_eq!(reloaded.start().await, LoadSource::Stored);
        assert_eq!(reloaded.snapshot(), session.snapshot());
    }

    #[tokio::test]
    async fn test_clear_all_declined() {
        let (mut session, store) = ready_with(&two_lists()).await;
        let prompts = RefCell::new(Vec::new());

        let decline = |prompt: &str| {
            prompts.borrow_mut().push(prompt.to_string());
            false
        };
        assert!(!session.clear_all(&decline).await.unwrap());

        assert_eq!(prompts.into_inner(), vec![CLEAR_ALL_PROMPT.to_string()]);
        assert_eq!(*session.snapshot(), two_lists());
        assert!(store.raw(DEFAULT_STORAGE_KEY).await.is_some());
    }

    #[tokio::test]
    async fn test_clear_all_accepted_wins_over_pending_saves() {
        let (mut session, store) = ready_with(&two_lists()).await;

        session.add_list("Unsaved").unwrap();
        session.begin_list_drag("L1").unwrap();
        assert!(session.clear_all(&|_: &str| true).await.unwrap());
        session.flush().await;

        assert!(session.snapshot().is_empty());
        assert_eq!(session.dragged_list(), None);
        assert_eq!(store.raw(DEFAULT_STORAGE_KEY).await, None);

        let mut reloaded = controller(store);
        assert_eq!(reloaded.start().await, LoadSource::Seeded);
    }
}
