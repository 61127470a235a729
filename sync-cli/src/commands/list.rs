//! Show tasks.

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};
use todo_sync_client::SyncConfig;
use todo_sync_core::{query, DayStats};
use todo_sync_types::{Category, TodoItem};

use super::{local_today, open, print_rows};

/// Which tasks to show.
#[derive(Debug, Default)]
pub struct Filter {
    pub date: Option<NaiveDate>,
    pub category: Option<Category>,
    pub all: bool,
    pub overdue: bool,
    pub search: Option<String>,
}

/// Run the list command.
pub async fn run(sync: SyncConfig, filter: Filter) -> Result<()> {
    let manager = open(sync).await;
    let todos = manager.current_list();
    manager.shutdown().await?;

    let now = Utc::now();
    let day = filter.date.unwrap_or_else(local_today);
    let shown = select(&todos, &filter, now, day);

    match (filter.all, filter.overdue) {
        (true, _) => println!("All tasks"),
        (_, true) => println!("Overdue tasks"),
        _ => println!("Tasks for {}", day),
    }
    print_rows(&shown, now);

    let stats = DayStats::of(shown.iter().copied());
    println!();
    println!("{} shown, {} done, {} pending", stats.total, stats.completed, stats.pending);
    Ok(())
}

/// Apply the filter and sort for display.
fn select<'a>(
    todos: &'a [TodoItem],
    filter: &Filter,
    now: DateTime<Utc>,
    day: NaiveDate,
) -> Vec<&'a TodoItem> {
    let mut shown: Vec<&TodoItem> = if filter.overdue {
        query::overdue(todos, now, &Local)
    } else if filter.all {
        todos.iter().collect()
    } else {
        query::for_day(todos, day, &Local)
    };

    if let Some(category) = filter.category {
        shown.retain(|t| t.category == category);
    }
    if let Some(needle) = filter.search.as_deref() {
        let hits = query::search(todos, needle);
        shown.retain(|t| hits.iter().any(|h| h.id == t.id));
    }

    query::sort_for_display(&mut shown);
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use todo_sync_types::Priority;

    fn sample(now: DateTime<Utc>) -> Vec<TodoItem> {
        vec![
            TodoItem::new("Buy oat milk")
                .scheduled_for(now)
                .with_category(Category::Shopping),
            TodoItem::new("Quarterly report")
                .scheduled_for(now)
                .with_category(Category::Work)
                .with_priority(Priority::High),
            TodoItem::new("Dentist")
                .scheduled_for(now + Duration::days(3))
                .with_category(Category::Health),
            TodoItem::new("Tax return")
                .scheduled_for(now - Duration::days(5))
                .due(now - Duration::days(2))
                .with_category(Category::Finance),
        ]
    }

    fn titles(shown: &[&TodoItem]) -> Vec<String> {
        shown.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn default_shows_today_in_display_order() {
        let now = Utc::now();
        let todos = sample(now);
        let today = query::day_of(&now, &Local);

        let shown = select(&todos, &Filter::default(), now, today);

        assert_eq!(titles(&shown), ["Quarterly report", "Buy oat milk"]);
    }

    #[test]
    fn category_and_search_narrow_results() {
        let now = Utc::now();
        let todos = sample(now);
        let filter = Filter {
            all: true,
            category: Some(Category::Shopping),
            search: Some("MILK".to_string()),
            ..Filter::default()
        };

        let shown = select(&todos, &filter, now, local_today());

        assert_eq!(titles(&shown), ["Buy oat milk"]);
    }

    #[test]
    fn overdue_ignores_day() {
        let now = Utc::now();
        let todos = sample(now);
        let filter = Filter {
            overdue: true,
            ..Filter::default()
        };

        let shown = select(&todos, &filter, now, local_today());

        assert_eq!(titles(&shown), ["Tax return"]);
    }
}
