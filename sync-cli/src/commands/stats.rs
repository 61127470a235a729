//! Completion summary.

use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use todo_sync_client::SyncConfig;
use todo_sync_core::{query, DayStats};

use super::{local_today, open};

/// Run the stats command.
pub async fn run(sync: SyncConfig, date: Option<NaiveDate>) -> Result<()> {
    let role = sync.role;
    let manager = open(sync).await;
    let todos = manager.current_list();
    manager.shutdown().await?;

    let now = Utc::now();
    let day = date.unwrap_or_else(local_today);
    let on_day = DayStats::of(query::for_day(&todos, day, &Local));
    let overall = DayStats::of(&todos);
    let overdue = query::overdue(&todos, now, &Local).len();

    println!("=== todo-sync stats ({}) ===", role);
    println!();
    println!("{}:", day);
    println!("  Total:     {}", on_day.total);
    println!("  Done:      {}", on_day.completed);
    println!("  Pending:   {}", on_day.pending);
    println!("  Progress:  {:.0}%", on_day.completion_ratio() * 100.0);
    println!();
    println!("All days:");
    println!("  Total:     {}", overall.total);
    println!("  Done:      {}", overall.completed);
    println!("  Overdue:   {}", overdue);
    Ok(())
}
