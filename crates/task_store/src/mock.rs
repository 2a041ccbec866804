//! Mock task store for handler tests.
//!
//! Enable the `mock` feature to use [`MockTaskStore`] from another crate.

use async_trait::async_trait;
use entities::Task;
use mockall::mock;

use crate::{TaskStore as TaskStoreTrait, TaskStoreResult};

mock! {
    /// Mock implementation of [`TaskStore`](crate::TaskStore) using mockall.
    ///
    /// Every expected call must be declared up front; an unexpected call
    /// panics, and `times(..)` expectations are verified on drop.
    pub TaskStore {}

    #[async_trait]
    impl TaskStoreTrait for TaskStore {
        async fn list_tasks(&self) -> TaskStoreResult<Vec<Task>>;
        async fn get_task(&self, id: &str) -> TaskStoreResult<Option<Task>>;
        async fn list_tasks_by_user(&self, user_id: &str) -> TaskStoreResult<Vec<Task>>;
        async fn create_task(&self, task: &Task) -> TaskStoreResult<()>;
        async fn update_task(&self, task: &Task) -> TaskStoreResult<()>;
        async fn delete_task(&self, id: &str) -> TaskStoreResult<()>;
    }
}
