//! Merge engine: reconcile a peer's list with the local one.
//!
//! The policy is "remote wins" at whole-record granularity:
//! 1. every remote record, in remote order, first occurrence per id
//! 2. every local record whose id was not already taken
//!
//! No field decides freshness. A record present on both sides always comes
//! out as the remote version, even if the local copy was edited later. Such
//! overridden ids are reported in [`MergeOutcome::overridden`] so the caller
//! can log them.

use std::collections::{HashMap, HashSet};
use todo_sync_types::{TodoId, TodoItem};

/// Result of a merge plus bookkeeping for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The reconciled list. Contains no duplicate ids.
    pub items: Vec<TodoItem>,
    /// Records taken from the remote side.
    pub from_remote: usize,
    /// Local records kept because the remote did not have them.
    pub kept_local: usize,
    /// Ids present on both sides where the local version differed and was dropped.
    pub overridden: Vec<TodoId>,
}

/// Merge `remote` into `local`, remote taking priority per id.
pub fn merge_remote_wins(remote: &[TodoItem], local: &[TodoItem]) -> MergeOutcome {
    let local_by_id: HashMap<TodoId, &TodoItem> = local.iter().map(|t| (t.id, t)).collect();

    let mut seen: HashSet<TodoId> = HashSet::with_capacity(remote.len() + local.len());
    let mut items = Vec::with_capacity(remote.len() + local.len());
    let mut overridden = Vec::new();

    for todo in remote {
        if !seen.insert(todo.id) {
            continue;
        }
        if let Some(mine) = local_by_id.get(&todo.id) {
            if *mine != todo {
                overridden.push(todo.id);
            }
        }
        items.push(todo.clone());
    }
    let from_remote = items.len();

    for todo in local {
        if seen.insert(todo.id) {
            items.push(todo.clone());
        }
    }
    let kept_local = items.len() - from_remote;

    MergeOutcome {
        items,
        from_remote,
        kept_local,
        overridden,
    }
}
