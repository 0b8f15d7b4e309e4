//! Minute-of-day arithmetic over half-open `[start, end)` spans.
//!
//! Every scheduling question in this crate reduces to integer minute offsets
//! within one calendar day. Adjacent spans (one ends exactly when the next
//! starts) do NOT overlap.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Minute offset of a time-of-day from midnight (`00:00` → 0, `09:30` → 570).
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// A half-open `[start, end)` interval in minutes-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start_min: u32,
    pub end_min: u32,
}

impl Span {
    pub fn new(start_min: u32, end_min: u32) -> Self {
        Self { start_min, end_min }
    }

    /// Build a span from a block's start/end times, truncated to minutes.
    pub fn from_times(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start_min: minute_of_day(start),
            end_min: minute_of_day(end),
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_min.saturating_sub(self.start_min)
    }

    /// Two spans overlap iff `s1 < e2 && e1 > s2`.
    ///
    /// The half-open test covers partial overlap, full containment, and
    /// identical spans, while spans that merely touch at a boundary are not
    /// overlapping. A zero-length span overlaps nothing.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start_min < other.end_min && self.end_min > other.start_min
    }

    /// Minutes shared by two spans: `min(e1, e2) - max(s1, s2)`, 0 if disjoint.
    pub fn overlap_minutes(&self, other: &Span) -> u32 {
        if !self.overlaps(other) {
            return 0;
        }
        self.end_min.min(other.end_min) - self.start_min.max(other.start_min)
    }
}
