//! End-to-end scenarios: two data managers joined by a `PairedChannel`.

use std::collections::HashSet;
use std::time::Duration;
use tempfile::tempdir;
use todo_sync_client::{
    DetachedChannel, MemoryStore, PairedChannel, SyncConfig, TodoManager, TodoStore,
};
use todo_sync_types::{DeviceRole, TodoId, TodoItem};
use tokio::time::sleep;

struct Pair {
    phone: TodoManager,
    watch: TodoManager,
    phone_link: PairedChannel,
    watch_link: PairedChannel,
}

async fn pair_with(phone_items: &[TodoItem], watch_items: &[TodoItem]) -> Pair {
    let (phone_link, watch_link) = PairedChannel::pair();
    let phone = TodoManager::start(
        SyncConfig::new(DeviceRole::Primary, "/unused"),
        MemoryStore::with_items(phone_items),
        phone_link.clone(),
    )
    .await;
    let watch = TodoManager::start(
        SyncConfig::new(DeviceRole::Companion, "/unused"),
        MemoryStore::with_items(watch_items),
        watch_link.clone(),
    )
    .await;

    Pair {
        phone,
        watch,
        phone_link,
        watch_link,
    }
}

fn ids(todos: &[TodoItem]) -> HashSet<TodoId> {
    todos.iter().map(|t| t.id).collect()
}

// ===========================================
// Convergence
// ===========================================

#[tokio::test(start_paused = true)]
async fn edits_on_either_side_converge() {
    let pair = pair_with(&[], &[]).await;
    let todo = TodoItem::new("Buy milk");

    pair.phone.add(todo.clone()).await.unwrap();
    sleep(Duration::from_millis(600)).await;

    assert_eq!(pair.watch.current_list(), pair.phone.current_list());

    pair.watch.toggle_completion(todo.id).await.unwrap();
    sleep(Duration::from_millis(600)).await;

    assert!(pair.phone.current_list()[0].is_completed);
    assert_eq!(pair.watch.current_list(), pair.phone.current_list());
}

#[tokio::test(start_paused = true)]
async fn received_list_is_not_echoed() {
    let pair = pair_with(&[], &[]).await;

    pair.phone.add(TodoItem::new("one way")).await.unwrap();
    sleep(Duration::from_millis(900)).await;

    assert_eq!(pair.watch_link.received_count(), 1);
    assert_eq!(pair.phone_link.received_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn startup_exchange_unions_both_lists() {
    let a = TodoItem::new("phone only");
    let b = TodoItem::new("watch only");
    let pair = pair_with(&[a.clone()], &[b.clone()]).await;

    sleep(Duration::from_millis(1100)).await;

    let expected: HashSet<TodoId> = [a.id, b.id].into_iter().collect();
    assert_eq!(ids(&pair.phone.current_list()), expected);
    assert_eq!(ids(&pair.watch.current_list()), expected);
    // Requests only, no pushes
    assert_eq!(pair.phone_link.received_count(), 0);
    assert_eq!(pair.watch_link.received_count(), 0);
}

// ===========================================
// Reachability
// ===========================================

#[tokio::test(start_paused = true)]
async fn offline_edit_arrives_after_reconnect() {
    let pair = pair_with(&[], &[]).await;
    pair.phone_link.set_reachable(false);
    sleep(Duration::from_millis(10)).await;

    pair.phone.add(TodoItem::new("written offline")).await.unwrap();
    sleep(Duration::from_millis(600)).await;
    assert!(pair.watch.current_list().is_empty());

    pair.watch_link.set_reachable(true);
    sleep(Duration::from_millis(50)).await;

    assert_eq!(pair.watch.current_list().len(), 1);
    assert_eq!(pair.watch.current_list()[0].title, "written offline");
    assert_eq!(ids(&pair.phone.current_list()), ids(&pair.watch.current_list()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn offline_toggle_of_shared_record_survives_reconnect() {
    for round in 0..20 {
        let shared = TodoItem::new("shared");
        let (phone_link, watch_link) = PairedChannel::pair();
        let timings = |role| {
            SyncConfig::new(role, "/unused")
                .with_debounce(Duration::from_millis(20))
                .with_startup_delay(Duration::from_millis(20))
        };
        let phone = TodoManager::start(
            timings(DeviceRole::Primary),
            MemoryStore::with_items(&[shared.clone()]),
            phone_link.clone(),
        )
        .await;
        let watch = TodoManager::start(
            timings(DeviceRole::Companion),
            MemoryStore::with_items(&[shared.clone()]),
            watch_link.clone(),
        )
        .await;
        sleep(Duration::from_millis(60)).await;

        phone_link.set_reachable(false);
        sleep(Duration::from_millis(10)).await;
        phone.toggle_completion(shared.id).await.unwrap();
        sleep(Duration::from_millis(60)).await;
        watch_link.set_reachable(true);
        sleep(Duration::from_millis(100)).await;

        assert!(phone.current_list()[0].is_completed, "phone reverted in round {}", round);
        assert!(watch.current_list()[0].is_completed, "watch missed edit in round {}", round);

        phone.shutdown().await.unwrap();
        watch.shutdown().await.unwrap();
    }
}

#[tokio::test(start_paused = true)]
async fn malformed_payload_leaves_list_alone() {
    let existing = TodoItem::new("keep");
    let pair = pair_with(&[], &[existing.clone()]).await;

    pair.watch_link.inject_raw(b"\xc1 definitely not a message");
    sleep(Duration::from_millis(10)).await;

    assert_eq!(pair.watch.current_list(), vec![existing]);
}

// ===========================================
// Durable Store
// ===========================================

#[tokio::test]
async fn list_survives_restart() {
    let dir = tempdir().unwrap();
    let config = SyncConfig::new(DeviceRole::Primary, dir.path());
    let kept = TodoItem::new("Pay rent");
    let done = TodoItem::new("Water plants");

    let manager = TodoManager::open(config.clone(), DetachedChannel::new()).await;
    manager.add(kept.clone()).await.unwrap();
    manager.add(done.clone()).await.unwrap();
    manager.toggle_completion(done.id).await.unwrap();
    manager.shutdown().await.unwrap();

    let reopened = TodoManager::open(config, DetachedChannel::new()).await;
    let list = reopened.current_list();

    assert_eq!(list.len(), 2);
    assert_eq!(list[0], kept);
    assert!(list[1].is_completed);
}

#[tokio::test]
async fn roles_sharing_a_directory_keep_separate_files() {
    let dir = tempdir().unwrap();
    let (phone_link, watch_link) = PairedChannel::pair();
    let phone_config = SyncConfig::new(DeviceRole::Primary, dir.path())
        .with_debounce(Duration::from_millis(20));
    let watch_config = SyncConfig::new(DeviceRole::Companion, dir.path());

    let phone = TodoManager::open(phone_config.clone(), phone_link).await;
    let _watch = TodoManager::open(watch_config.clone(), watch_link).await;

    phone.add(TodoItem::new("shared")).await.unwrap();
    sleep(Duration::from_millis(300)).await;

    let phone_file = todo_sync_client::FileStore::for_config(&phone_config);
    let watch_file = todo_sync_client::FileStore::for_config(&watch_config);
    assert_ne!(phone_file.path(), watch_file.path());
    assert_eq!(phone_file.load().await, watch_file.load().await);
    assert_eq!(watch_file.load().await.len(), 1);
}
