//! Delete a task.

use anyhow::Result;
use todo_sync_client::SyncConfig;

use super::{open, resolve_id};

/// Run the delete command.
pub async fn run(sync: SyncConfig, needle: &str) -> Result<()> {
    let manager = open(sync).await;
    let list = manager.current_list();
    let id = resolve_id(&list, needle)?;
    let title = list
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.title.clone())
        .unwrap_or_default();

    manager.delete(id).await?;
    manager.shutdown().await?;

    println!("Deleted {}: {}", id.short(), title);
    Ok(())
}
