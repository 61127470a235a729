//! The to-do record exchanged between devices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TodoId;

/// Task urgency. Sorting uses [`Priority::rank`], not declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    /// Rank 0.
    High,
    /// Rank 1.
    #[default]
    Medium,
    /// Rank 2.
    Low,
}

impl Priority {
    /// All priorities, highest first.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Sort rank: high=0 < medium=1 < low=2.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    /// Display color name.
    pub fn color(&self) -> &'static str {
        match self {
            Priority::High => "red",
            Priority::Medium => "orange",
            Priority::Low => "green",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(label)
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown priority: {s}"))
    }
}

/// Closed set of task labels. Purely cosmetic for sync purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    /// Blue, briefcase.
    Work,
    /// Green, person.
    #[default]
    Personal,
    /// Orange, cart.
    Shopping,
    /// Red, heart.
    Health,
    /// Purple, dollar sign.
    Finance,
    /// Yellow, book.
    Study,
}

impl Category {
    /// Every category, in picker order.
    pub const ALL: [Category; 6] = [
        Category::Work,
        Category::Personal,
        Category::Shopping,
        Category::Health,
        Category::Finance,
        Category::Study,
    ];

    /// Display color name.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Work => "blue",
            Category::Personal => "green",
            Category::Shopping => "orange",
            Category::Health => "red",
            Category::Finance => "purple",
            Category::Study => "yellow",
        }
    }

    /// Symbol name used by the UI.
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Work => "briefcase.fill",
            Category::Personal => "person.fill",
            Category::Shopping => "cart.fill",
            Category::Health => "heart.fill",
            Category::Finance => "dollarsign.circle.fill",
            Category::Study => "book.fill",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// One task.
///
/// Field names are fixed camelCase on the wire and on disk so that either
/// device role can decode the other's payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Identity, immutable.
    pub id: TodoId,
    /// Display title. Callers guarantee it is non-empty.
    pub title: String,
    /// Optional free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Completion flag.
    pub is_completed: bool,
    /// Urgency.
    pub priority: Priority,
    /// Label.
    pub category: Category,
    /// The calendar day of this instant (local time) is the task's day.
    pub scheduled_date: DateTime<Utc>,
    /// Optional deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Creation instant, immutable.
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    /// Create a fresh, incomplete task scheduled for now.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self::with_id(TodoId::new(), title, now)
    }

    /// Build a task around a donor id, as records arriving through sync are.
    pub fn with_id(id: TodoId, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            is_completed: false,
            priority: Priority::default(),
            category: Category::default(),
            scheduled_date: created_at,
            due_date: None,
            created_at,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the scheduled day.
    pub fn scheduled_for(mut self, when: DateTime<Utc>) -> Self {
        self.scheduled_date = when;
        self
    }

    /// Set the due date.
    pub fn due(mut self, when: DateTime<Utc>) -> Self {
        self.due_date = Some(when);
        self
    }

    /// Set the completion flag.
    pub fn completed(mut self, done: bool) -> Self {
        self.is_completed = done;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn priority_rank_order() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn priority_serializes_capitalized() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"High\"");
        assert_eq!("low".parse::<Priority>(), Ok(Priority::Low));
    }

    #[test]
    fn category_has_six_distinct_icons() {
        let icons: std::collections::HashSet<_> =
            Category::ALL.iter().map(|c| c.icon()).collect();
        assert_eq!(icons.len(), 6);
        assert_eq!("finance".parse::<Category>(), Ok(Category::Finance));
    }

    #[test]
    fn new_item_defaults() {
        let item = TodoItem::new("Buy milk");
        assert!(!item.is_completed);
        assert_eq!(item.priority, Priority::Medium);
        assert_eq!(item.category, Category::Personal);
        assert_eq!(item.scheduled_date, item.created_at);
        assert!(item.description.is_none());
    }

    #[test]
    fn json_uses_camel_case_field_names() {
        let when = Utc.with_ymd_and_hms(2025, 5, 29, 9, 0, 0).unwrap();
        let item = TodoItem::with_id(TodoId::new(), "Run", when)
            .due(when)
            .with_description("5k");
        let json = serde_json::to_value(&item).unwrap();
        let obj = json.as_object().unwrap();

        for key in [
            "id",
            "title",
            "description",
            "isCompleted",
            "priority",
            "category",
            "scheduledDate",
            "dueDate",
            "createdAt",
        ] {
            assert!(obj.contains_key(key), "missing field {key}");
        }
        assert_eq!(obj.len(), 9);
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let json = r#"{
            "id": "6f1c1a39-5b1a-4c59-9d36-0a4e2a6a8b11",
            "title": "Stretch",
            "isCompleted": true,
            "priority": "Low",
            "category": "Health",
            "scheduledDate": "2025-05-29T08:00:00Z",
            "createdAt": "2025-05-28T20:00:00Z"
        }"#;
        let item: TodoItem = serde_json::from_str(json).unwrap();
        assert!(item.is_completed);
        assert!(item.due_date.is_none());
        assert!(item.description.is_none());
        assert_eq!(item.category, Category::Health);
    }
}
