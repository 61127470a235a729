//! Run both devices in-process and narrate what syncs.

use anyhow::Result;
use std::path::Path;
use std::time::Duration;
use todo_sync_client::{MemoryStore, PairedChannel, TodoManager};
use todo_sync_types::{Category, DeviceRole, Priority, TodoItem};

use crate::config::Config;

/// Run the demo command.
///
/// Uses in-memory stores so the real list files are never touched.
pub async fn run(config: &Config) -> Result<()> {
    let phone_config = config.sync_config(DeviceRole::Primary, Path::new("demo"));
    let watch_config = config.sync_config(DeviceRole::Companion, Path::new("demo"));
    let settle = phone_config.debounce + Duration::from_millis(200);

    let (phone_link, watch_link) = PairedChannel::pair();
    let phone = TodoManager::start(phone_config, MemoryStore::new(), phone_link.clone()).await;
    let watch = TodoManager::start(watch_config, MemoryStore::new(), watch_link.clone()).await;

    println!("=== todo-sync demo ===");
    println!();

    // 1. A burst of edits goes out as one push
    println!("Phone adds three tasks in quick succession...");
    let milk = TodoItem::new("Buy milk")
        .with_category(Category::Shopping)
        .with_priority(Priority::High);
    phone.add(milk.clone()).await?;
    phone
        .add(TodoItem::new("Morning run").with_category(Category::Health))
        .await?;
    phone
        .add(TodoItem::new("Review budget").with_category(Category::Finance))
        .await?;
    tokio::time::sleep(settle).await;
    println!(
        "  watch received {} push(es), now has {} tasks",
        watch_link.received_count(),
        watch.current_list().len()
    );

    // 2. Edits flow the other way and are not echoed back
    println!();
    println!("Watch completes \"{}\"...", milk.title);
    watch.toggle_completion(milk.id).await?;
    tokio::time::sleep(settle).await;
    let done_on_phone = phone
        .current_list()
        .iter()
        .any(|t| t.id == milk.id && t.is_completed);
    println!("  phone sees it done: {}", done_on_phone);
    println!(
        "  pushes received: phone {}, watch {}",
        phone_link.received_count(),
        watch_link.received_count()
    );

    // 3. Offline edits are delivered on reconnect
    println!();
    println!("Link goes down; phone adds \"Call the bank\"...");
    phone_link.set_reachable(false);
    tokio::time::sleep(Duration::from_millis(50)).await;
    phone.add(TodoItem::new("Call the bank")).await?;
    tokio::time::sleep(settle).await;
    println!("  watch has {} tasks while offline", watch.current_list().len());

    println!("Link comes back...");
    phone_link.set_reachable(true);
    tokio::time::sleep(settle).await;
    println!("  watch has {} tasks", watch.current_list().len());

    // 4. Both lists agree
    println!();
    let converged = same_ids(&phone.current_list(), &watch.current_list());
    println!("Converged: {}", if converged { "yes" } else { "no" });
    for todo in watch.current_list() {
        let mark = if todo.is_completed { "x" } else { " " };
        println!("  [{}] {}", mark, todo.title);
    }

    phone.shutdown().await?;
    watch.shutdown().await?;
    Ok(())
}

fn same_ids(a: &[TodoItem], b: &[TodoItem]) -> bool {
    let mut a: Vec<_> = a.iter().map(|t| (t.id, t.is_completed)).collect();
    let mut b: Vec<_> = b.iter().map(|t| (t.id, t.is_completed)).collect();
    a.sort();
    b.sort();
    a == b
}
