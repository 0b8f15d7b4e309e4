//! # timeblock-engine
//!
//! Calendar scheduling engine for a day planner: places time-bounded blocks
//! on a per-day timeline, rejects overlapping placements, packs overlapping
//! blocks into side-by-side columns for rendering, and aggregates planned
//! vs. effective minutes per category.
//!
//! The engine is synchronous and request/response only. The layout pass is
//! pure and may be re-invoked freely; it performs no caching.
//!
//! ## Modules
//!
//! - [`interval`] — minute-of-day arithmetic over half-open spans
//! - [`model`] — the [`Block`] data model and status lifecycle
//! - [`conflict`] — overlap detection against existing active blocks
//! - [`storage`] — opaque block repository + in-memory implementation
//! - [`lookup`] — task/category directory collaborator seams
//! - [`store`] — conflict-checked CRUD and queries
//! - [`layout`] — column packing + vertical metrics for rendering
//! - [`summary`] — planned/effective aggregation per category
//! - [`error`] — error types

pub mod conflict;
pub mod error;
pub mod interval;
pub mod layout;
pub mod lookup;
pub mod model;
pub mod storage;
pub mod store;
pub mod summary;

pub use conflict::find_conflicts;
pub use error::{Result, ScheduleError, StorageError};
pub use layout::{layout, vertical_metrics, BlockGeometry, VerticalMetrics};
pub use lookup::{
    CategoryDirectory, CategoryInfo, InMemoryCategoryDirectory, InMemoryTaskDirectory,
    TaskDirectory, TaskInfo,
};
pub use model::{Block, BlockKind, BlockStatus, CategorySnapshot, TaskRef};
pub use storage::{BlockRepository, InMemoryBlockRepository};
pub use store::{BlockPatch, BlockStore, CreateBlock};
pub use summary::{summarize, CategoryBreakdown, DailySummary};
