//! Task store trait definitions.

use async_trait::async_trait;
use entities::Task;

use crate::TaskStoreResult;

/// Trait for task storage operations.
///
/// Every backend implements the same contract:
/// - reads never treat "no match" as an error,
/// - `update_task` fails with [`TaskStoreError::NotFound`] when the ID is
///   unknown,
/// - `delete_task` succeeds whether or not the ID exists.
///
/// [`TaskStoreError::NotFound`]: crate::TaskStoreError::NotFound
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Lists every stored task in backend order.
    async fn list_tasks(&self) -> TaskStoreResult<Vec<Task>>;

    /// Gets a task by ID.
    async fn get_task(&self, id: &str) -> TaskStoreResult<Option<Task>>;

    /// Lists tasks owned by a user.
    async fn list_tasks_by_user(&self, user_id: &str) -> TaskStoreResult<Vec<Task>>;

    /// Creates a new task.
    async fn create_task(&self, task: &Task) -> TaskStoreResult<()>;

    /// Replaces an existing task.
    async fn update_task(&self, task: &Task) -> TaskStoreResult<()>;

    /// Deletes a task by ID.
    async fn delete_task(&self, id: &str) -> TaskStoreResult<()>;
}
