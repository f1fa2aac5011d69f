//! Compact rendering of a task's status history.

use crate::task::domain::{StatusHistoryEntry, TaskStatus};
use chrono::{DateTime, Utc};

const DRAG_MARKER: &str = "via drag and drop";
const MOVED_PREFIX: &str = "Task moved to";

/// A run of consecutive history entries with the same status and notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryGroup {
    /// Status of every entry in the run.
    pub status: TaskStatus,
    /// Shortened notes shared by the run.
    pub notes: String,
    /// Number of entries collapsed into the group.
    pub occurrences: usize,
    /// Timestamp of the first entry in iteration order.
    pub first_created_at: DateTime<Utc>,
    /// Timestamp of the last entry in iteration order.
    pub last_created_at: DateTime<Utc>,
}

/// Collapses consecutive entries whose status and shortened notes match.
///
/// Drag-and-drop notes become `Moved to <Label>`. Entries are grouped in
/// the order given, so pass them most recent first for a timeline view.
#[must_use]
pub fn group_history<'a, I>(entries: I) -> Vec<HistoryGroup>
where
    I: IntoIterator<Item = &'a StatusHistoryEntry>,
{
    let mut groups: Vec<HistoryGroup> = Vec::new();
    for entry in entries {
        let notes = shorten_notes(entry);
        match groups.last_mut() {
            Some(group) if group.status == entry.status() && group.notes == notes => {
                group.occurrences += 1;
                group.last_created_at = entry.created_at();
            }
            _ => groups.push(HistoryGroup {
                status: entry.status(),
                notes,
                occurrences: 1,
                first_created_at: entry.created_at(),
                last_created_at: entry.created_at(),
            }),
        }
    }
    groups
}

fn shorten_notes(entry: &StatusHistoryEntry) -> String {
    let notes = entry.notes();
    if notes.contains(DRAG_MARKER) {
        return format!("Moved to {}", entry.status().label());
    }
    notes.strip_prefix(MOVED_PREFIX).map_or_else(
        || notes.to_owned(),
        |rest| format!("Moved to{rest}"),
    )
}
