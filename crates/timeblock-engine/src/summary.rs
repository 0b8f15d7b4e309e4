//! Planned vs. effective time aggregation for one day.
//!
//! Partitions the day's non-cancelled blocks into two overlapping sets by
//! status: planned (intent to spend the time, including not yet started)
//! and effective (the activity was actually underway or finished). Sums
//! interval durations per category and overall.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::Block;

/// Bucket name for blocks that carry no category snapshot at all.
const UNCATEGORIZED: &str = "Uncategorized";

/// Per-category minute totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// Bucket key: the category snapshot id when present, else its display
    /// name — so two ad hoc categories with different names stay distinct.
    pub key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub planned_minutes: u32,
    pub effective_minutes: u32,
}

/// Daily totals plus the per-category breakdown, sorted by descending
/// planned minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_planned_minutes: u32,
    pub total_effective_minutes: u32,
    pub categories: Vec<CategoryBreakdown>,
}

/// Aggregate planned and effective minutes for `date`.
///
/// Blocks on other dates and cancelled blocks contribute nothing. Effective
/// minutes are always a subset of planned minutes, so
/// `total_effective_minutes <= total_planned_minutes`.
pub fn summarize(date: NaiveDate, blocks: &[Block]) -> DailySummary {
    let mut buckets: HashMap<String, CategoryBreakdown> = HashMap::new();
    let mut total_planned = 0u32;
    let mut total_effective = 0u32;

    for block in blocks {
        if block.date != date || block.status.is_cancelled() {
            continue;
        }

        let minutes = block.duration_minutes();
        let (key, name, color) = match &block.category {
            Some(category) => (
                category.id.clone().unwrap_or_else(|| category.name.clone()),
                category.name.clone(),
                category.color.clone(),
            ),
            None => (UNCATEGORIZED.to_string(), UNCATEGORIZED.to_string(), None),
        };

        let bucket = buckets.entry(key.clone()).or_insert(CategoryBreakdown {
            key,
            name,
            color,
            planned_minutes: 0,
            effective_minutes: 0,
        });

        if block.status.is_planned() {
            bucket.planned_minutes += minutes;
            total_planned += minutes;
        }
        if block.status.is_effective() {
            bucket.effective_minutes += minutes;
            total_effective += minutes;
        }
    }

    let mut categories: Vec<CategoryBreakdown> = buckets.into_values().collect();
    categories.sort_by(|a, b| {
        b.planned_minutes
            .cmp(&a.planned_minutes)
            .then(a.name.cmp(&b.name))
    });

    DailySummary {
        date,
        total_planned_minutes: total_planned,
        total_effective_minutes: total_effective,
        categories,
    }
}
