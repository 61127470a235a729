//! Toggle a task's completion.

use anyhow::{Context, Result};
use todo_sync_client::SyncConfig;

use super::{open, resolve_id};

/// Run the toggle command.
pub async fn run(sync: SyncConfig, needle: &str) -> Result<()> {
    let manager = open(sync).await;
    let id = resolve_id(&manager.current_list(), needle)?;

    manager.toggle_completion(id).await?;
    let todo = manager
        .current_list()
        .into_iter()
        .find(|t| t.id == id)
        .context("Task vanished while toggling")?;
    manager.shutdown().await?;

    let state = if todo.is_completed { "done" } else { "not done" };
    println!("Marked {} {}: {}", todo.id.short(), state, todo.title);
    Ok(())
}
