//! External collaborator seams: the task and category directories.
//!
//! The store consults these only while building the denormalized snapshots
//! at create time (or on an explicit category re-assignment). They are never
//! queried again afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Display metadata for an externally-owned task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub title: String,
    /// Parent/grandparent titles, nearest first.
    #[serde(default)]
    pub parent_chain: Vec<String>,
}

/// Display metadata for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

pub trait TaskDirectory: Send + Sync {
    fn get_task(&self, task_id: &str) -> Option<TaskInfo>;
}

pub trait CategoryDirectory: Send + Sync {
    fn get_category(&self, category_id: &str) -> Option<CategoryInfo>;
}

/// Map-backed task directory, used by tests and the CLI.
#[derive(Debug, Default)]
pub struct InMemoryTaskDirectory {
    tasks: HashMap<String, TaskInfo>,
}

impl InMemoryTaskDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(tasks: HashMap<String, TaskInfo>) -> Self {
        Self { tasks }
    }

    pub fn insert(&mut self, task_id: impl Into<String>, info: TaskInfo) {
        self.tasks.insert(task_id.into(), info);
    }
}

impl TaskDirectory for InMemoryTaskDirectory {
    fn get_task(&self, task_id: &str) -> Option<TaskInfo> {
        self.tasks.get(task_id).cloned()
    }
}

/// Map-backed category directory, used by tests and the CLI.
#[derive(Debug, Default)]
pub struct InMemoryCategoryDirectory {
    categories: HashMap<String, CategoryInfo>,
}

impl InMemoryCategoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(categories: HashMap<String, CategoryInfo>) -> Self {
        Self { categories }
    }

    pub fn insert(&mut self, category_id: impl Into<String>, info: CategoryInfo) {
        self.categories.insert(category_id.into(), info);
    }
}

impl CategoryDirectory for InMemoryCategoryDirectory {
    fn get_category(&self, category_id: &str) -> Option<CategoryInfo> {
        self.categories.get(category_id).cloned()
    }
}
