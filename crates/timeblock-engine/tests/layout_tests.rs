//! Tests for the column-packing layout engine and vertical metrics.

use chrono::{NaiveDate, NaiveTime};
use timeblock_engine::{layout, vertical_metrics, Block, BlockKind, BlockStatus};

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// Helper to create a block on the shared test day.
fn block(id: &str, start: (u32, u32), end: (u32, u32)) -> Block {
    Block {
        id: id.to_string(),
        kind: BlockKind::Event,
        title: format!("block {id}"),
        date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
        start_time: time(start.0, start.1),
        end_time: time(end.0, end.1),
        status: BlockStatus::Scheduled,
        task: None,
        category: None,
        comment: String::new(),
    }
}

#[test]
fn empty_input_empty_map() {
    assert!(layout(&[]).is_empty());
}

#[test]
fn single_block_gets_full_width() {
    let blocks = vec![block("a", (9, 0), (10, 0))];

    let geometry = layout(&blocks);

    let a = &geometry["a"];
    assert_eq!(a.column, 0);
    assert_eq!(a.total_columns, 1);
    assert_eq!(a.left_pct, 0.0);
    assert_eq!(a.width_pct, 100.0);
}

#[test]
fn two_overlapping_blocks_split_in_half() {
    let blocks = vec![block("a", (9, 0), (10, 0)), block("b", (9, 30), (10, 30))];

    let geometry = layout(&blocks);

    let a = &geometry["a"];
    let b = &geometry["b"];
    assert_eq!(a.total_columns, 2);
    assert_eq!(b.total_columns, 2);
    assert_ne!(a.column, b.column, "overlapping blocks never share a column");
    assert_eq!(a.width_pct, 50.0);
    assert_eq!(b.width_pct, 50.0);
    assert_eq!(a.column, 0, "the earlier block anchors the first column");
    assert_eq!(b.left_pct, 50.0);
}

#[test]
fn chain_overlap_forms_one_group_with_two_columns() {
    // A 09:00-10:00, B 09:30-11:00, C 10:30-11:30: A-B overlap, B-C overlap,
    // A-C do not — one connected group, two columns, A and C share column 0
    // while B occupies column 1 for its full span.
    let blocks = vec![
        block("a", (9, 0), (10, 0)),
        block("b", (9, 30), (11, 0)),
        block("c", (10, 30), (11, 30)),
    ];

    let geometry = layout(&blocks);

    let a = &geometry["a"];
    let b = &geometry["b"];
    let c = &geometry["c"];
    assert_eq!(a.total_columns, 2, "the whole chain shares one group");
    assert_eq!(b.total_columns, 2);
    assert_eq!(c.total_columns, 2);
    assert_eq!(a.column, 0);
    assert_eq!(b.column, 1);
    assert_eq!(c.column, 0, "never-overlapping blocks may share a column");
    assert_eq!(a.width_pct, 50.0, "even split across the group's columns");
}

#[test]
fn bridged_groups_merge_into_one() {
    // D and E never touch; F overlaps both, so all three compete for space
    // and must land in a single group.
    let blocks = vec![
        block("d", (9, 0), (9, 30)),
        block("e", (10, 0), (10, 30)),
        block("f", (9, 15), (10, 15)),
    ];

    let geometry = layout(&blocks);

    assert_eq!(geometry["d"].total_columns, 2);
    assert_eq!(geometry["e"].total_columns, 2);
    assert_eq!(geometry["f"].total_columns, 2);
    assert_eq!(
        geometry["d"].column, geometry["e"].column,
        "the disjoint pair shares a column around the bridge"
    );
    assert_ne!(geometry["f"].column, geometry["d"].column);
}

#[test]
fn disjoint_blocks_form_separate_full_width_groups() {
    let blocks = vec![
        block("a", (9, 0), (10, 0)),
        block("b", (10, 0), (11, 0)), // adjacent, not overlapping
        block("c", (14, 0), (15, 0)),
    ];

    let geometry = layout(&blocks);

    for id in ["a", "b", "c"] {
        let g = &geometry[id];
        assert_eq!(g.total_columns, 1, "{id} should be alone in its group");
        assert_eq!(g.column, 0);
        assert_eq!(g.width_pct, 100.0);
    }
}

#[test]
fn triple_overlap_needs_three_columns() {
    let blocks = vec![
        block("a", (9, 0), (12, 0)),
        block("b", (9, 30), (11, 0)),
        block("c", (10, 0), (10, 30)),
    ];

    let geometry = layout(&blocks);

    assert_eq!(
        geometry["a"].total_columns, 3,
        "three simultaneously active blocks need three columns"
    );
    let mut columns = [geometry["a"].column, geometry["b"].column, geometry["c"].column];
    columns.sort_unstable();
    assert_eq!(columns, [0, 1, 2], "each block gets its own column");
}

#[test]
fn longer_block_anchors_first_column_on_start_tie() {
    let blocks = vec![block("short", (9, 0), (9, 30)), block("long", (9, 0), (11, 0))];

    let geometry = layout(&blocks);

    assert_eq!(
        geometry["long"].column, 0,
        "ties on start minute go to the longer block first"
    );
    assert_eq!(geometry["short"].column, 1);
}

#[test]
fn geometry_percentages_partition_the_row() {
    let blocks = vec![
        block("a", (9, 0), (10, 0)),
        block("b", (9, 15), (9, 45)),
        block("c", (9, 30), (10, 30)),
    ];

    let geometry = layout(&blocks);

    for g in geometry.values() {
        assert_eq!(g.left_pct, g.column as f64 / g.total_columns as f64 * 100.0);
        assert_eq!(g.width_pct, 100.0 / g.total_columns as f64);
        assert!(g.left_pct + g.width_pct <= 100.0 + f64::EPSILON);
    }
}

#[test]
fn every_block_receives_geometry() {
    let blocks: Vec<Block> = (0..10)
        .map(|i| block(&format!("blk-{i}"), (8 + i, 0), (8 + i, 45)))
        .collect();

    let geometry = layout(&blocks);

    assert_eq!(geometry.len(), blocks.len());
}

// ── vertical metrics ────────────────────────────────────────────────────────

#[test]
fn vertical_metrics_scale_with_minutes() {
    let b = block("a", (9, 0), (10, 30));

    let metrics = vertical_metrics(&b, 2.0, 20.0);

    assert_eq!(metrics.top_px, 540.0 * 2.0);
    assert_eq!(metrics.height_px, 90.0 * 2.0);
}

#[test]
fn vertical_metrics_apply_presentation_floor() {
    let b = block("a", (9, 0), (9, 5));

    let metrics = vertical_metrics(&b, 1.0, 20.0);

    assert_eq!(
        metrics.height_px, 20.0,
        "near-zero blocks get the minimum height"
    );
}
