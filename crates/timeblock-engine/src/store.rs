//! Conflict-checked CRUD and queries over scheduled blocks.
//!
//! The store is constructed explicitly at process start with its repository
//! and directory collaborators injected; there is no global handle. Writes
//! are check-then-act with no transactional wrapping: two concurrent callers
//! can each pass the conflict check before either commits. That race is an
//! accepted limitation of the single-logical-writer model, not remedied here.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use crate::conflict::find_conflicts;
use crate::error::{Result, ScheduleError};
use crate::interval::Span;
use crate::lookup::{CategoryDirectory, TaskDirectory};
use crate::model::{Block, BlockKind, BlockStatus, CategorySnapshot, TaskRef};
use crate::storage::BlockRepository;
use crate::summary::{self, DailySummary};

const ID_PREFIX: &str = "blk-";

/// Input for [`BlockStore::create`].
#[derive(Debug, Clone)]
pub struct CreateBlock {
    pub kind: BlockKind,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Display title. Required for `event` blocks; `task` blocks snapshot
    /// the external task's title instead.
    pub title: Option<String>,
    /// Required for `task` blocks.
    pub task_id: Option<String>,
    pub category_id: Option<String>,
    pub comment: Option<String>,
}

/// Partial update for [`BlockStore::update`]; omitted fields are untouched.
#[derive(Debug, Clone, Default)]
pub struct BlockPatch {
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub status: Option<BlockStatus>,
    pub title: Option<String>,
    pub comment: Option<String>,
    /// Re-assigns the category and re-snapshots its display data.
    pub category_id: Option<String>,
}

impl BlockPatch {
    fn touches_placement(&self) -> bool {
        self.date.is_some() || self.start_time.is_some() || self.end_time.is_some()
    }
}

pub struct BlockStore {
    repository: Arc<dyn BlockRepository>,
    tasks: Arc<dyn TaskDirectory>,
    categories: Arc<dyn CategoryDirectory>,
    next_id: AtomicU64,
}

impl BlockStore {
    /// Build a store over an existing repository. The id counter resumes
    /// after the highest `blk-<n>` already present so reloading a repository
    /// never re-issues an id.
    pub fn new(
        repository: Arc<dyn BlockRepository>,
        tasks: Arc<dyn TaskDirectory>,
        categories: Arc<dyn CategoryDirectory>,
    ) -> Result<Self> {
        let highest = repository
            .list_all()?
            .iter()
            .filter_map(|block| block.id.strip_prefix(ID_PREFIX))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Ok(Self {
            repository,
            tasks,
            categories,
            next_id: AtomicU64::new(highest + 1),
        })
    }

    /// Validate, conflict-check, snapshot external metadata, assign an id,
    /// and persist a new block. New blocks start as `scheduled`.
    pub fn create(&self, input: CreateBlock) -> Result<Block> {
        validate_interval(input.start_time, input.end_time)?;

        let (title, task) = match input.kind {
            BlockKind::Event => {
                let title = input
                    .title
                    .filter(|title| !title.trim().is_empty())
                    .ok_or_else(|| {
                        ScheduleError::Validation("event blocks require a title".to_string())
                    })?;
                (title, None)
            }
            BlockKind::Task => {
                let task_id = input.task_id.ok_or_else(|| {
                    ScheduleError::Validation("task blocks require a task_id".to_string())
                })?;
                let info = self.tasks.get_task(&task_id).ok_or_else(|| {
                    ScheduleError::Validation(format!("unknown task id {task_id}"))
                })?;
                (
                    info.title,
                    Some(TaskRef {
                        task_id,
                        parent_chain: info.parent_chain,
                    }),
                )
            }
        };

        let category = match input.category_id {
            Some(category_id) => Some(self.snapshot_category(&category_id)?),
            None => None,
        };

        let same_day = self.repository.list_by_date(input.date)?;
        let candidate = Span::from_times(input.start_time, input.end_time);
        let conflicts = find_conflicts(&same_day, input.date, candidate, None);
        if !conflicts.is_empty() {
            return Err(ScheduleError::Conflict(conflicts));
        }

        let block = Block {
            id: self.allocate_id(),
            kind: input.kind,
            title,
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            status: BlockStatus::Scheduled,
            task,
            category,
            comment: input.comment.unwrap_or_default(),
        };
        self.repository.upsert(&block)?;
        Ok(block)
    }

    /// Apply a partial patch. A patch that moves the block in time (or
    /// re-activates a cancelled block) re-runs the conflict check excluding
    /// the block's own prior placement; on any failure the stored block is
    /// left completely unmodified.
    pub fn update(&self, id: &str, patch: BlockPatch) -> Result<Block> {
        let current = self.get(id)?;
        let mut updated = current.clone();

        if let Some(date) = patch.date {
            updated.date = date;
        }
        if let Some(start_time) = patch.start_time {
            updated.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            updated.end_time = end_time;
        }
        if let Some(status) = patch.status {
            updated.status = status;
        }
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(ScheduleError::Validation(
                    "title must not be empty".to_string(),
                ));
            }
            updated.title = title.clone();
        }
        if let Some(comment) = &patch.comment {
            updated.comment = comment.clone();
        }
        if let Some(category_id) = &patch.category_id {
            updated.category = Some(self.snapshot_category(category_id)?);
        }

        validate_interval(updated.start_time, updated.end_time)?;

        let reactivated = current.status.is_cancelled() && !updated.status.is_cancelled();
        if patch.touches_placement() || reactivated {
            let same_day = self.repository.list_by_date(updated.date)?;
            let conflicts = find_conflicts(&same_day, updated.date, updated.span(), Some(id));
            if !conflicts.is_empty() {
                return Err(ScheduleError::Conflict(conflicts));
            }
        }

        self.repository.upsert(&updated)?;
        Ok(updated)
    }

    /// Hard delete. No tombstone is kept.
    pub fn delete(&self, id: &str) -> Result<()> {
        if self.repository.remove(id)? {
            Ok(())
        } else {
            Err(ScheduleError::NotFound(id.to_string()))
        }
    }

    pub fn get(&self, id: &str) -> Result<Block> {
        self.repository
            .get_by_id(id)?
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()))
    }

    /// All blocks whose date falls in the inclusive `[start, end]` range,
    /// ordered by date then start time.
    pub fn query_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Block>> {
        let mut blocks = self.repository.list_range(start, end)?;
        sort_chronological(&mut blocks);
        Ok(blocks)
    }

    /// All blocks referencing `task_id`, ordered by date then start time.
    pub fn query_by_task(&self, task_id: &str) -> Result<Vec<Block>> {
        let mut blocks: Vec<Block> = self
            .repository
            .list_all()?
            .into_iter()
            .filter(|block| {
                block
                    .task
                    .as_ref()
                    .is_some_and(|task| task.task_id == task_id)
            })
            .collect();
        sort_chronological(&mut blocks);
        Ok(blocks)
    }

    /// Blocks before `before` (optionally since `since`) that were never
    /// resolved — neither completed nor cancelled. Most recent date first,
    /// start time ascending within a date, capped at `limit`. This surfaces
    /// things that should have happened but weren't closed out.
    pub fn query_past_incomplete(
        &self,
        before: NaiveDate,
        since: Option<NaiveDate>,
        limit: usize,
    ) -> Result<Vec<Block>> {
        let mut blocks: Vec<Block> = self
            .repository
            .list_all()?
            .into_iter()
            .filter(|block| block.date < before)
            .filter(|block| since.is_none_or(|since| block.date >= since))
            .filter(|block| !block.status.is_resolved())
            .collect();
        blocks.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then(a.start_time.cmp(&b.start_time))
                .then(a.id.cmp(&b.id))
        });
        blocks.truncate(limit);
        Ok(blocks)
    }

    /// Planned vs. effective minutes per category for one day.
    pub fn daily_summary(&self, date: NaiveDate) -> Result<DailySummary> {
        let blocks = self.repository.list_by_date(date)?;
        Ok(summary::summarize(date, &blocks))
    }

    fn allocate_id(&self) -> String {
        format!("{ID_PREFIX}{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn snapshot_category(&self, category_id: &str) -> Result<CategorySnapshot> {
        let info = self.categories.get_category(category_id).ok_or_else(|| {
            ScheduleError::Validation(format!("unknown category id {category_id}"))
        })?;
        Ok(CategorySnapshot {
            id: Some(category_id.to_string()),
            name: info.name,
            color: info.color,
        })
    }
}

fn validate_interval(start: NaiveTime, end: NaiveTime) -> Result<()> {
    if start >= end {
        return Err(ScheduleError::Validation(format!(
            "start_time {start} must be before end_time {end}"
        )));
    }
    Ok(())
}

fn sort_chronological(blocks: &mut [Block]) {
    blocks.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then(a.start_time.cmp(&b.start_time))
            .then(a.id.cmp(&b.id))
    });
}
