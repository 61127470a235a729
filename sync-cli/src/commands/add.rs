//! Add a task.

use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use todo_sync_client::SyncConfig;
use todo_sync_core::query;
use todo_sync_types::{Category, Priority, TodoItem};

use super::{local_today, open, start_of_local_day};

/// Fields of the task to add.
#[derive(Debug)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub category: Category,
    pub date: Option<NaiveDate>,
    pub due: Option<NaiveDate>,
}

/// Run the add command.
pub async fn run(sync: SyncConfig, task: NewTask) -> Result<()> {
    let todo = build(task, local_today())?;

    let manager = open(sync).await;
    manager.add(todo.clone()).await?;
    manager.shutdown().await?;

    println!("Added {}: {}", todo.id.short(), todo.title);
    Ok(())
}

/// Validate the input and build the record.
fn build(task: NewTask, today: NaiveDate) -> Result<TodoItem> {
    let title = task.title.trim();
    if title.is_empty() {
        bail!("Title must not be empty");
    }

    let mut todo = TodoItem::new(title)
        .with_priority(task.priority)
        .with_category(task.category);

    if let Some(description) = task.description.filter(|d| !d.trim().is_empty()) {
        todo = todo.with_description(description);
    }

    match task.date {
        Some(day) if !query::can_schedule_on(day, today) => {
            bail!("Cannot schedule on {}, it is in the past", day);
        }
        Some(day) if day != today => {
            todo = todo.scheduled_for(start_of_local_day(day)?);
        }
        _ => todo = todo.scheduled_for(Utc::now()),
    }

    if let Some(due) = task.due {
        todo = todo.due(start_of_local_day(due)?);
    }

    Ok(todo)
}
