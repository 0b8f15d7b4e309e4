//! Error types for scheduling operations.
//!
//! Every failure is returned to the caller as a structured value: the engine
//! never silently drops a write, never auto-resolves a conflict, and never
//! retries internally. Retry is the caller's responsibility.

use thiserror::Error;

use crate::model::Block;

/// Failure in the opaque storage backend. Not recoverable by this engine.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Malformed input: an inverted interval, a missing required field, or a
    /// task/category reference that does not resolve.
    #[error("invalid block: {0}")]
    Validation(String),

    /// One or more existing active blocks overlap the requested placement.
    /// Carries the conflicting blocks so the caller can present or resolve
    /// them; there is no force-override path.
    #[error("{} existing block(s) overlap the requested time", .0.len())]
    Conflict(Vec<Block>),

    /// Update/delete/lookup referenced an unknown block id.
    #[error("no block with id {0}")]
    NotFound(String),

    #[error("persistence failure: {0}")]
    Persistence(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
