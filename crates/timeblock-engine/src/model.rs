//! The block data model: one scheduled time interval with a status.
//!
//! Task and category display data on a block is a denormalized snapshot
//! captured when the block is created (or when a category is explicitly
//! re-assigned). A later rename of the source task or category is not
//! reflected on already-scheduled blocks.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::interval::Span;

/// What a block represents: a placement of an externally-owned task, or a
/// standalone event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Task,
    Event,
}

/// Block lifecycle status. The set is closed: deserialization rejects
/// anything outside these five values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockStatus {
    Scheduled,
    InProgress,
    PartiallyCompleted,
    Completed,
    Cancelled,
}

impl BlockStatus {
    /// Statuses that signal intent to spend the time, including not yet
    /// started.
    pub fn is_planned(self) -> bool {
        !matches!(self, BlockStatus::Cancelled)
    }

    /// Statuses that signal the activity was actually underway or finished.
    /// A strict subset of [`BlockStatus::is_planned`].
    pub fn is_effective(self) -> bool {
        matches!(
            self,
            BlockStatus::InProgress | BlockStatus::PartiallyCompleted | BlockStatus::Completed
        )
    }

    pub fn is_cancelled(self) -> bool {
        matches!(self, BlockStatus::Cancelled)
    }

    /// Completed and cancelled blocks are settled; everything else is still
    /// in play and shows up in the past-incomplete review query.
    pub fn is_resolved(self) -> bool {
        matches!(self, BlockStatus::Completed | BlockStatus::Cancelled)
    }
}

/// External task identity plus the parent/grandparent title chain, captured
/// once at block creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub task_id: String,
    #[serde(default)]
    pub parent_chain: Vec<String>,
}

/// Denormalized category display data. `id` is absent for ad hoc categories
/// that only carry a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A single scheduled time interval within one calendar day.
///
/// Invariant: `start_time < end_time`. The store enforces this at every
/// create/update together with the no-overlap rule against other
/// non-cancelled blocks on the same date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub kind: BlockKind,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: BlockStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySnapshot>,
    #[serde(default)]
    pub comment: String,
}

impl Block {
    /// The block's `[start, end)` minute-of-day span.
    pub fn span(&self) -> Span {
        Span::from_times(self.start_time, self.end_time)
    }

    pub fn duration_minutes(&self) -> u32 {
        self.span().duration_minutes()
    }
}
