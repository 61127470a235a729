//! The in-memory to-do list owned by a device.
//!
//! Mutations report whether they matched a record so the caller can decide
//! whether to persist and schedule a sync. A mutation that matches nothing
//! leaves the list untouched and is not an error.

use todo_sync_types::{TodoId, TodoItem};

/// Unordered collection of records keyed by [`TodoId`].
///
/// Insertion order is kept only because it is cheap; presentation order is
/// computed on read by [`crate::query`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoList {
    items: Vec<TodoItem>,
}

impl TodoList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap previously loaded records.
    pub fn from_items(items: Vec<TodoItem>) -> Self {
        Self { items }
    }

    /// Append a record.
    pub fn add(&mut self, item: TodoItem) {
        self.items.push(item);
    }

    /// Remove the first record with `id`. Returns `false` if none matched.
    pub fn remove(&mut self, id: &TodoId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replace the record sharing `item.id`. Returns `false` if none matched.
    pub fn replace(&mut self, item: TodoItem) -> bool {
        match self.position(&item.id) {
            Some(index) => {
                self.items[index] = item;
                true
            }
            None => false,
        }
    }

    /// Flip the completion flag of `id`, returning the new value.
    pub fn toggle(&mut self, id: &TodoId) -> Option<bool> {
        let index = self.position(id)?;
        let item = &mut self.items[index];
        item.is_completed = !item.is_completed;
        Some(item.is_completed)
    }

    /// Swap in a whole new collection (used after a merge).
    pub fn replace_all(&mut self, items: Vec<TodoItem>) {
        self.items = items;
    }

    /// Look up a record.
    pub fn get(&self, id: &TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// Borrow the records.
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Owned copy of the records.
    pub fn snapshot(&self) -> Vec<TodoItem> {
        self.items.clone()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there are no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &TodoId) -> Option<usize> {
        self.items.iter().position(|item| item.id == *id)
    }
}
