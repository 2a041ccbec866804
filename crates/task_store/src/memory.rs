//! In-memory task store implementation.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use entities::Task;
use tokio::sync::RwLock;

use crate::{TaskStore, TaskStoreError, TaskStoreResult};

/// In-memory task store for local runs and tests.
///
/// Behaves like the document store: creating an existing ID overwrites it.
#[derive(Debug, Default, Clone)]
pub struct MemoryTaskStore {
    tasks: Arc<RwLock<HashMap<String, Task>>>,
}

impl MemoryTaskStore {
    /// Creates a new in-memory task store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_tasks(&self) -> TaskStoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.values().cloned().collect())
    }

    async fn get_task(&self, id: &str) -> TaskStoreResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(id).cloned())
    }

    async fn list_tasks_by_user(&self, user_id: &str) -> TaskStoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_task(&self, task: &Task) -> TaskStoreResult<()> {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id.clone(), task.clone());
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> TaskStoreResult<()> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&task.id) {
            Some(existing) => {
                *existing = task.clone();
                Ok(())
            }
            None => Err(TaskStoreError::not_found("Task", task.id.clone())),
        }
    }

    async fn delete_task(&self, id: &str) -> TaskStoreResult<()> {
        let mut tasks = self.tasks.write().await;
        tasks.remove(id);
        Ok(())
    }
}
