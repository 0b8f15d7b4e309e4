//! Detect existing blocks that overlap a candidate placement.
//!
//! Cancelled blocks never participate, and an update passes its own id as
//! `exclude_id` so a block is not compared against its prior placement.
//! Adjacent blocks (one ends exactly when the next starts) are NOT conflicts.

use chrono::NaiveDate;

use crate::interval::Span;
use crate::model::Block;

/// Find all active blocks on `date` whose interval overlaps `candidate`.
///
/// Two intervals overlap iff `s1 < e2 && e1 > s2`. The half-open test covers
/// partial overlap, full containment, and identical intervals, and excludes
/// the adjacent case where one interval ends exactly when the other starts.
///
/// An empty result means the placement is free. The store treats a non-empty
/// result as a hard failure; there is no force-override path.
pub fn find_conflicts(
    existing: &[Block],
    date: NaiveDate,
    candidate: Span,
    exclude_id: Option<&str>,
) -> Vec<Block> {
    let mut conflicts: Vec<Block> = existing
        .iter()
        .filter(|block| block.date == date)
        .filter(|block| !block.status.is_cancelled())
        .filter(|block| exclude_id != Some(block.id.as_str()))
        .filter(|block| block.span().overlaps(&candidate))
        .cloned()
        .collect();

    // Sort by start time (then by id for stability).
    conflicts.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
    conflicts
}
