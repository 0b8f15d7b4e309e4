//! Column packing for overlapping blocks, plus vertical time-axis metrics.
//!
//! Pure and stateless: a renderer calls [`layout`] on whatever block set is
//! currently visible (one day's worth) and gets per-block column geometry
//! back. Overlap-groups are the connected components of the "intervals
//! overlap" relation; columns within a group come from greedy interval-graph
//! coloring, which is optimal for interval graphs — the column count equals
//! the size of the largest mutually-overlapping subset.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::interval::Span;
use crate::model::Block;

/// Column geometry for one block.
///
/// `left_pct`/`width_pct` are an even split across the overlap-group's
/// column count: `column / total_columns * 100` and `100 / total_columns`.
/// A block that overlaps only one neighbor still gets the same narrow width
/// as blocks in a denser overlap elsewhere in the same connected group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockGeometry {
    pub column: usize,
    pub total_columns: usize,
    pub left_pct: f64,
    pub width_pct: f64,
}

/// Vertical pixel extent of a block on the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerticalMetrics {
    pub top_px: f64,
    pub height_px: f64,
}

/// Compute side-by-side column geometry for a set of blocks.
///
/// Steps: normalize to minute spans; sort by start ascending with longer
/// blocks first on ties (the visually larger block anchors column 0);
/// cluster into overlap-groups; merge groups transitively until the groups
/// are exactly the connected components of the overlap relation; assign
/// columns greedily within each group; split the width evenly across the
/// group's columns.
///
/// Deterministic for any permutation of the same block set (block id is the
/// final sort tie-break).
pub fn layout(blocks: &[Block]) -> HashMap<String, BlockGeometry> {
    if blocks.is_empty() {
        return HashMap::new();
    }

    let mut entries: Vec<(&str, Span)> = blocks
        .iter()
        .map(|block| (block.id.as_str(), block.span()))
        .collect();
    entries.sort_by(|a, b| {
        a.1.start_min
            .cmp(&b.1.start_min)
            .then(b.1.end_min.cmp(&a.1.end_min))
            .then(a.0.cmp(b.0))
    });

    // First-touch clustering over the sorted entries: a block joins the
    // first group containing at least one directly-overlapping block.
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for index in 0..entries.len() {
        let span = entries[index].1;
        match groups
            .iter_mut()
            .find(|group| group.iter().any(|&member| entries[member].1.overlaps(&span)))
        {
            Some(group) => group.push(index),
            None => groups.push(vec![index]),
        }
    }

    // Transitive merge until a fixed point. First-touch clustering only
    // guarantees a direct overlap with one member: blocks A-B-C where A
    // overlaps B and B overlaps C must share a group even when A and C
    // never touch, because all three compete for the same layout space.
    loop {
        let mut merged = None;
        'scan: for i in 0..groups.len() {
            for j in (i + 1)..groups.len() {
                let connected = groups[i].iter().any(|&a| {
                    groups[j]
                        .iter()
                        .any(|&b| entries[a].1.overlaps(&entries[b].1))
                });
                if connected {
                    merged = Some((i, j));
                    break 'scan;
                }
            }
        }
        match merged {
            Some((i, j)) => {
                let absorbed = groups.remove(j);
                groups[i].extend(absorbed);
            }
            None => break,
        }
    }

    // Greedy interval-graph coloring per group: place each block into the
    // first column whose most-recently-placed occupant does not overlap it.
    // Geometry is finalized only once the group's column count is known.
    let mut geometry = HashMap::with_capacity(blocks.len());
    for group in &mut groups {
        // Entry indices are already in (start asc, end desc) order.
        group.sort_unstable();

        let mut column_tails: Vec<Span> = Vec::new();
        let mut placements: Vec<(usize, usize)> = Vec::with_capacity(group.len());
        for &member in group.iter() {
            let span = entries[member].1;
            let column = match column_tails.iter().position(|tail| !tail.overlaps(&span)) {
                Some(column) => {
                    column_tails[column] = span;
                    column
                }
                None => {
                    column_tails.push(span);
                    column_tails.len() - 1
                }
            };
            placements.push((member, column));
        }

        let total_columns = column_tails.len();
        let width_pct = 100.0 / total_columns as f64;
        for (member, column) in placements {
            geometry.insert(
                entries[member].0.to_string(),
                BlockGeometry {
                    column,
                    total_columns,
                    left_pct: column as f64 / total_columns as f64 * 100.0,
                    width_pct,
                },
            );
        }
    }

    geometry
}

/// Vertical extent at a caller-supplied pixels-per-minute scale.
///
/// `min_height_px` is a presentation floor that keeps near-zero-duration
/// blocks interactable; it has no bearing on conflict detection or grouping.
pub fn vertical_metrics(block: &Block, px_per_minute: f64, min_height_px: f64) -> VerticalMetrics {
    let span = block.span();
    VerticalMetrics {
        top_px: span.start_min as f64 * px_per_minute,
        height_px: (span.duration_minutes() as f64 * px_per_minute).max(min_height_px),
    }
}
