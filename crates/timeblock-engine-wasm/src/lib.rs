//! WASM bindings for timeblock-engine.
//!
//! Exposes the engine's pure surfaces — conflict detection, column layout,
//! and daily summaries — to JavaScript via `wasm-bindgen`. Block sets are
//! passed as JSON strings in the same shape the engine serializes natively.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p timeblock-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/timeblock-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/timeblock_engine_wasm.wasm
//! ```

use chrono::{NaiveDate, NaiveTime};
use timeblock_engine::interval::Span;
use timeblock_engine::{find_conflicts, Block};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers: parse the primitive inputs crossing the boundary
// ---------------------------------------------------------------------------

/// Parse a `YYYY-MM-DD` day key.
fn parse_date(s: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| JsValue::from_str(&format!("Invalid date '{}': {}", s, e)))
}

/// Parse a time-of-day; accepts `HH:MM` and `HH:MM:SS`.
fn parse_time(s: &str) -> Result<NaiveTime, JsValue> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| JsValue::from_str(&format!("Invalid time '{}': {}", s, e)))
}

/// Parse a JSON array of blocks.
fn parse_blocks(json: &str) -> Result<Vec<Block>, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid blocks JSON: {}", e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute side-by-side column geometry for a set of blocks.
///
/// `blocks_json` must be a JSON array of block objects. Returns a JSON object
/// mapping block id to `{column, total_columns, left_pct, width_pct}`.
#[wasm_bindgen(js_name = "computeLayout")]
pub fn compute_layout(blocks_json: &str) -> Result<String, JsValue> {
    let blocks = parse_blocks(blocks_json)?;
    to_json(&timeblock_engine::layout(&blocks))
}

/// Find the active blocks on `date` that overlap the `[start, end)` candidate
/// interval.
///
/// `exclude_id` lets an update check against all *other* blocks. Returns a
/// JSON array of the conflicting blocks, earliest first; an empty array means
/// the placement is free.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts_json(
    blocks_json: &str,
    date: &str,
    start: &str,
    end: &str,
    exclude_id: Option<String>,
) -> Result<String, JsValue> {
    let blocks = parse_blocks(blocks_json)?;
    let date = parse_date(date)?;
    let candidate = Span::from_times(parse_time(start)?, parse_time(end)?);

    let conflicts = find_conflicts(&blocks, date, candidate, exclude_id.as_deref());
    to_json(&conflicts)
}

/// Aggregate planned vs. effective minutes per category for one day.
///
/// Returns a JSON object with `total_planned_minutes`,
/// `total_effective_minutes`, and a `categories` array sorted by descending
/// planned minutes.
#[wasm_bindgen(js_name = "dailySummary")]
pub fn daily_summary(blocks_json: &str, date: &str) -> Result<String, JsValue> {
    let blocks = parse_blocks(blocks_json)?;
    let date = parse_date(date)?;
    to_json(&timeblock_engine::summarize(date, &blocks))
}

/// Vertical pixel extents for each block at a pixels-per-minute scale.
///
/// Returns a JSON object mapping block id to `{top_px, height_px}`.
/// `min_height_px` is a presentation floor for near-zero-duration blocks.
#[wasm_bindgen(js_name = "verticalMetrics")]
pub fn vertical_metrics(
    blocks_json: &str,
    px_per_minute: f64,
    min_height_px: f64,
) -> Result<String, JsValue> {
    let blocks = parse_blocks(blocks_json)?;
    let metrics: std::collections::HashMap<&str, timeblock_engine::VerticalMetrics> = blocks
        .iter()
        .map(|block| {
            (
                block.id.as_str(),
                timeblock_engine::vertical_metrics(block, px_per_minute, min_height_px),
            )
        })
        .collect();
    to_json(&metrics)
}
