//! Property-based tests for the layout engine and the daily aggregation.
//!
//! These verify invariants that must hold for *any* block set, not just the
//! hand-picked examples in `layout_tests.rs` and `summary_tests.rs`.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;
use timeblock_engine::{layout, summarize, Block, BlockKind, BlockStatus};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_status() -> impl Strategy<Value = BlockStatus> {
    prop_oneof![
        Just(BlockStatus::Scheduled),
        Just(BlockStatus::InProgress),
        Just(BlockStatus::PartiallyCompleted),
        Just(BlockStatus::Completed),
        Just(BlockStatus::Cancelled),
    ]
}

/// Generate a block on the shared test day with a start minute in 00:00-22:59
/// and a duration of 1-120 minutes, clamped to the end of the day.
fn arb_block(index: usize) -> impl Strategy<Value = Block> {
    (0u32..1380, 1u32..=120, arb_status()).prop_map(move |(start_min, duration, status)| {
        let end_min = (start_min + duration).min(1439);
        Block {
            id: format!("blk-{index}"),
            kind: BlockKind::Event,
            title: format!("block {index}"),
            date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            start_time: NaiveTime::from_hms_opt(start_min / 60, start_min % 60, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end_min / 60, end_min % 60, 0).unwrap(),
            status,
            task: None,
            category: None,
            comment: String::new(),
        }
    })
}

fn arb_blocks(max: usize) -> impl Strategy<Value = Vec<Block>> {
    prop::collection::vec(Just(()), 0..max).prop_flat_map(|slots| {
        slots
            .iter()
            .enumerate()
            .map(|(index, _)| arb_block(index))
            .collect::<Vec<_>>()
    })
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn minutes(block: &Block) -> (u32, u32) {
    let span = block.span();
    (span.start_min, span.end_min)
}

fn blocks_overlap(a: &Block, b: &Block) -> bool {
    a.span().overlaps(&b.span())
}

/// Connected components of the overlap relation, computed independently of
/// the engine (breadth-first search over pairwise overlaps).
fn overlap_components(blocks: &[Block]) -> Vec<Vec<usize>> {
    let mut seen = vec![false; blocks.len()];
    let mut components = Vec::new();
    for root in 0..blocks.len() {
        if seen[root] {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = VecDeque::from([root]);
        seen[root] = true;
        while let Some(current) = queue.pop_front() {
            component.push(current);
            for next in 0..blocks.len() {
                if !seen[next] && blocks_overlap(&blocks[current], &blocks[next]) {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        components.push(component);
    }
    components
}

/// Maximum number of blocks simultaneously active at any instant, per the
/// half-open interval semantics. The maximum is always realized at some
/// block's start minute.
fn max_concurrent(blocks: &[Block], members: &[usize]) -> usize {
    members
        .iter()
        .map(|&i| {
            let (start, _) = minutes(&blocks[i]);
            members
                .iter()
                .filter(|&&j| {
                    let (s, e) = minutes(&blocks[j]);
                    s <= start && start < e
                })
                .count()
        })
        .max()
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Property 1: Soundness — overlapping blocks never share a column
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn overlapping_blocks_get_distinct_columns(blocks in arb_blocks(16)) {
        let geometry = layout(&blocks);

        for a in &blocks {
            for b in &blocks {
                if a.id != b.id && blocks_overlap(a, b) {
                    let ga = &geometry[&a.id];
                    let gb = &geometry[&b.id];
                    prop_assert_ne!(
                        ga.column, gb.column,
                        "{} and {} overlap but share column {}",
                        a.id, b.id, ga.column
                    );
                    prop_assert_eq!(
                        ga.total_columns, gb.total_columns,
                        "overlapping blocks must share a group"
                    );
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Optimality — a group's column count equals its maximum
// number of simultaneously active blocks
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn group_columns_match_max_concurrency(blocks in arb_blocks(16)) {
        let geometry = layout(&blocks);

        for component in overlap_components(&blocks) {
            let expected = max_concurrent(&blocks, &component);
            for &member in &component {
                let g = &geometry[&blocks[member].id];
                prop_assert_eq!(
                    g.total_columns, expected,
                    "component of {} needs exactly {} column(s)",
                    blocks[member].id, expected
                );
                prop_assert!(g.column < g.total_columns);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Determinism — a permuted input yields identical geometry
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn layout_is_permutation_invariant(
        (blocks, shuffled) in arb_blocks(16)
            .prop_flat_map(|blocks| (Just(blocks.clone()), Just(blocks).prop_shuffle()))
    ) {
        let original = layout(&blocks);
        let permuted = layout(&shuffled);

        prop_assert_eq!(original, permuted);
    }
}

// ---------------------------------------------------------------------------
// Property 4: Coverage — every block gets geometry within the row
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn every_block_gets_in_bounds_geometry(blocks in arb_blocks(16)) {
        let geometry = layout(&blocks);

        prop_assert_eq!(geometry.len(), blocks.len());
        let ids: HashSet<&str> = blocks.iter().map(|b| b.id.as_str()).collect();
        for (id, g) in &geometry {
            prop_assert!(ids.contains(id.as_str()));
            prop_assert!(g.total_columns >= 1);
            prop_assert!((0.0..=100.0).contains(&g.left_pct));
            prop_assert!(g.width_pct > 0.0 && g.width_pct <= 100.0);
            prop_assert!(g.left_pct + g.width_pct <= 100.0 + 1e-9);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: Aggregation subset law — effective <= planned, overall and
// per category
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn effective_minutes_never_exceed_planned(blocks in arb_blocks(16)) {
        let summary = summarize(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(), &blocks);

        prop_assert!(summary.total_effective_minutes <= summary.total_planned_minutes);
        for category in &summary.categories {
            prop_assert!(
                category.effective_minutes <= category.planned_minutes,
                "category {} breaks the subset law",
                category.name
            );
        }

        // Totals are consistent with the per-category breakdown.
        let planned_sum: u32 = summary.categories.iter().map(|c| c.planned_minutes).sum();
        let effective_sum: u32 = summary.categories.iter().map(|c| c.effective_minutes).sum();
        prop_assert_eq!(planned_sum, summary.total_planned_minutes);
        prop_assert_eq!(effective_sum, summary.total_effective_minutes);
    }
}
