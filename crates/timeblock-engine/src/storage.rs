//! Opaque block persistence.
//!
//! The engine treats storage as a durable key-value-by-id store with range
//! query support. Schema and migration mechanics belong to the backing
//! implementation, not to this crate. Repositories return blocks in no
//! particular order; the store applies the query orderings.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::error::StorageError;
use crate::model::Block;

pub trait BlockRepository: Send + Sync {
    /// Insert or replace the block with this id.
    fn upsert(&self, block: &Block) -> Result<(), StorageError>;

    fn get_by_id(&self, id: &str) -> Result<Option<Block>, StorageError>;

    /// Hard-remove. Returns whether a block with this id existed.
    fn remove(&self, id: &str) -> Result<bool, StorageError>;

    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Block>, StorageError>;

    /// All blocks whose date falls in the inclusive `[start, end]` range.
    fn list_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Block>, StorageError>;

    fn list_all(&self) -> Result<Vec<Block>, StorageError>;
}

/// In-memory repository backed by a `Mutex<HashMap>`.
#[derive(Debug, Default)]
pub struct InMemoryBlockRepository {
    blocks: Mutex<HashMap<String, Block>>,
}

impl InMemoryBlockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with existing blocks, keyed by their ids.
    pub fn with_blocks(blocks: impl IntoIterator<Item = Block>) -> Self {
        let blocks = blocks
            .into_iter()
            .map(|block| (block.id.clone(), block))
            .collect();
        Self {
            blocks: Mutex::new(blocks),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Block>>, StorageError> {
        self.blocks
            .lock()
            .map_err(|error| StorageError::Unavailable(format!("block store lock poisoned: {error}")))
    }
}

impl BlockRepository for InMemoryBlockRepository {
    fn upsert(&self, block: &Block) -> Result<(), StorageError> {
        let mut blocks = self.lock()?;
        blocks.insert(block.id.clone(), block.clone());
        Ok(())
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Block>, StorageError> {
        let blocks = self.lock()?;
        Ok(blocks.get(id).cloned())
    }

    fn remove(&self, id: &str) -> Result<bool, StorageError> {
        let mut blocks = self.lock()?;
        Ok(blocks.remove(id).is_some())
    }

    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Block>, StorageError> {
        let blocks = self.lock()?;
        Ok(blocks.values().filter(|b| b.date == date).cloned().collect())
    }

    fn list_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Block>, StorageError> {
        let blocks = self.lock()?;
        Ok(blocks
            .values()
            .filter(|b| b.date >= start && b.date <= end)
            .cloned()
            .collect())
    }

    fn list_all(&self) -> Result<Vec<Block>, StorageError> {
        let blocks = self.lock()?;
        Ok(blocks.values().cloned().collect())
    }
}
