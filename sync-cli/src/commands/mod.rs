//! CLI command implementations.

pub mod add;
pub mod delete;
pub mod demo;
pub mod list;
pub mod stats;
pub mod toggle;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use todo_sync_client::{DetachedChannel, SyncConfig, TodoManager};
use todo_sync_core::query;
use todo_sync_types::{TodoId, TodoItem};

/// Start the manager for a single-device command.
///
/// No peer is reachable from the command line, so the list is only read
/// from and written to this role's file.
pub async fn open(sync: SyncConfig) -> TodoManager {
    TodoManager::open(sync, DetachedChannel::new()).await
}

/// Find the task whose id equals `needle` or starts with it.
///
/// Hyphens are ignored on both sides, so the short form printed by `list`
/// can be extended with more characters.
pub fn resolve_id(todos: &[TodoItem], needle: &str) -> Result<TodoId> {
    let needle = needle.trim().to_ascii_lowercase().replace('-', "");
    if needle.is_empty() {
        bail!("Task id must not be empty");
    }

    let matches: Vec<TodoId> = todos
        .iter()
        .map(|t| t.id)
        .filter(|id| id.as_uuid().simple().to_string().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("No task matches '{}'", needle),
        _ => bail!(
            "'{}' matches {} tasks, use a longer prefix",
            needle,
            matches.len()
        ),
    }
}

/// Local calendar day right now.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Start of `day` in local time, as a UTC instant.
pub fn start_of_local_day(day: NaiveDate) -> Result<DateTime<Utc>> {
    let midnight = day.and_hms_opt(0, 0, 0).context("Invalid date")?;
    let local = Local
        .from_local_datetime(&midnight)
        .earliest()
        .with_context(|| format!("{} has no local midnight", day))?;
    Ok(local.with_timezone(&Utc))
}

/// One task as a table row.
pub fn format_row(todo: &TodoItem, now: DateTime<Utc>) -> String {
    let mark = if todo.is_completed { "x" } else { " " };
    let mut row = format!(
        "[{}] {}  {:<6}  {:<8}  {}",
        mark,
        todo.id.short(),
        todo.priority.to_string(),
        todo.category.to_string(),
        todo.title
    );

    if let Some(due) = todo.due_date {
        let due_day = query::day_of(&due, &Local);
        if query::is_overdue(todo, now, &Local) {
            row.push_str(&format!("  (due {}, OVERDUE)", due_day));
        } else {
            row.push_str(&format!("  (due {})", due_day));
        }
    }
    row
}

/// Print rows, or a placeholder when there are none.
pub fn print_rows(todos: &[&TodoItem], now: DateTime<Utc>) {
    if todos.is_empty() {
        println!("No tasks.");
        return;
    }
    for todo in todos {
        println!("{}", format_row(todo, now));
        if let Some(description) = todo.description.as_deref() {
            println!("       {}", description);
        }
    }
}
