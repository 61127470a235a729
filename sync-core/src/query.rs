//! Read-side views over a list snapshot.
//!
//! Nothing here is stored: filtering and ordering are recomputed on every
//! read. Day boundaries are taken in the caller's time zone (`chrono::Local`
//! in the app, fixed offsets in tests).

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use todo_sync_types::{Category, TodoItem};

/// Days shown before today in the date picker.
pub const STRIP_DAYS_BEFORE: i64 = 7;
/// Days shown after today in the date picker.
pub const STRIP_DAYS_AFTER: i64 = 14;

/// Calendar day of `instant` in `tz`.
pub fn day_of<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Records not yet done.
pub fn incomplete(items: &[TodoItem]) -> Vec<&TodoItem> {
    items.iter().filter(|t| !t.is_completed).collect()
}

/// Records already done.
pub fn completed(items: &[TodoItem]) -> Vec<&TodoItem> {
    items.iter().filter(|t| t.is_completed).collect()
}

/// Records scheduled on `day`.
pub fn for_day<'a, Tz: TimeZone>(
    items: &'a [TodoItem],
    day: NaiveDate,
    tz: &Tz,
) -> Vec<&'a TodoItem> {
    items
        .iter()
        .filter(|t| day_of(&t.scheduled_date, tz) == day)
        .collect()
}

/// Records scheduled on the day containing `now`.
pub fn today<'a, Tz: TimeZone>(
    items: &'a [TodoItem],
    now: DateTime<Utc>,
    tz: &Tz,
) -> Vec<&'a TodoItem> {
    for_day(items, day_of(&now, tz), tz)
}

/// True if the record is past due: due strictly before the start of today
/// and not completed.
pub fn is_overdue<Tz: TimeZone>(item: &TodoItem, now: DateTime<Utc>, tz: &Tz) -> bool {
    // `due < start_of(today)` holds exactly when due's local day is earlier
    // than today, which also sidesteps midnights skipped by DST.
    match &item.due_date {
        Some(due) => !item.is_completed && day_of(due, tz) < day_of(&now, tz),
        None => false,
    }
}

/// Every overdue record.
pub fn overdue<'a, Tz: TimeZone>(
    items: &'a [TodoItem],
    now: DateTime<Utc>,
    tz: &Tz,
) -> Vec<&'a TodoItem> {
    items.iter().filter(|t| is_overdue(t, now, tz)).collect()
}

/// Records on `day`, optionally restricted to one category, in display
/// order: incomplete first, then priority rank, then scheduled time.
pub fn for_category_on_day<'a, Tz: TimeZone>(
    items: &'a [TodoItem],
    category: Option<Category>,
    day: NaiveDate,
    tz: &Tz,
) -> Vec<&'a TodoItem> {
    let mut filtered: Vec<&TodoItem> = for_day(items, day, tz)
        .into_iter()
        .filter(|t| category.map_or(true, |c| t.category == c))
        .collect();
    sort_for_display(&mut filtered);
    filtered
}

/// Sort in display order (stable).
pub fn sort_for_display(items: &mut [&TodoItem]) {
    items.sort_by_key(|t| (t.is_completed, t.priority.rank(), t.scheduled_date));
}

/// Case-insensitive substring match over title and description.
/// An empty needle matches everything.
pub fn search<'a>(items: &'a [TodoItem], needle: &str) -> Vec<&'a TodoItem> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|t| {
            t.title.to_lowercase().contains(&needle)
                || t.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Completion counts for a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayStats {
    /// Number of records.
    pub total: usize,
    /// Records done.
    pub completed: usize,
    /// Records still open.
    pub pending: usize,
}

impl DayStats {
    /// Count the given records.
    pub fn of<'a>(items: impl IntoIterator<Item = &'a TodoItem>) -> Self {
        items.into_iter().fold(Self::default(), |mut stats, t| {
            stats.total += 1;
            if t.is_completed {
                stats.completed += 1;
            } else {
                stats.pending += 1;
            }
            stats
        })
    }

    /// Fraction completed in `0.0..=1.0`; `0.0` for an empty set.
    pub fn completion_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// The days offered by the date picker: a week back, today, two weeks ahead.
pub fn date_strip(today: NaiveDate) -> Vec<NaiveDate> {
    (-STRIP_DAYS_BEFORE..=STRIP_DAYS_AFTER)
        .map(|offset| today + Duration::days(offset))
        .collect()
}

/// New tasks may be scheduled for today or later, never in the past.
pub fn can_schedule_on(day: NaiveDate, today: NaiveDate) -> bool {
    day >= today
}
