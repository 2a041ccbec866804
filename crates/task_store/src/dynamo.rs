//! DynamoDB task store.
//!
//! Tasks live in a single table keyed by the string attribute `id`. The
//! remaining fields are stored as plain attributes; optional fields are
//! written as `NULL` when unset.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    error::DisplayErrorContext, operation::put_item::PutItemError, types::AttributeValue, Client,
};
use entities::Task;

use crate::{TaskStore, TaskStoreError, TaskStoreResult};

/// Default table name.
pub const DEFAULT_DYNAMODB_TABLE: &str = "tasks_v1";

const ID: &str = "id";
const USER_ID: &str = "user_id";
const BODY: &str = "body";
const COMPLETED: &str = "completed";
const PARENT: &str = "parent";
const REMINDER: &str = "reminder";

type Item = HashMap<String, AttributeValue>;

fn dynamo_error(context: &str, err: impl std::error::Error) -> TaskStoreError {
    TaskStoreError::DynamoDb(format!("{}: {}", context, DisplayErrorContext(&err)))
}

/// Document store backend over a DynamoDB table.
#[derive(Debug, Clone)]
pub struct DynamoTaskStore {
    client: Client,
    table_name: String,
}

impl DynamoTaskStore {
    /// Creates a store using the default AWS configuration chain
    /// (environment, profile files, instance metadata).
    pub async fn new(table_name: impl Into<String>) -> Self {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;
        Self::with_client(Client::new(&aws_config), table_name)
    }

    /// Creates a store from an existing client.
    pub fn with_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Returns the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Scans the table, following pagination, with an optional owner filter.
    async fn scan(&self, user_id: Option<&str>) -> TaskStoreResult<Vec<Task>> {
        let mut tasks = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let mut request = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take());
            if let Some(user_id) = user_id {
                request = request
                    .filter_expression("#user_id = :user_id")
                    .expression_attribute_names("#user_id", USER_ID)
                    .expression_attribute_values(":user_id", AttributeValue::S(user_id.to_string()));
            }

            let output = request
                .send()
                .await
                .map_err(|e| dynamo_error("failed to get tasks", e))?;

            for item in output.items.unwrap_or_default() {
                tasks.push(task_from_item(&item)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(tasks)
    }

    async fn get_item(&self, id: &str) -> TaskStoreResult<Option<Item>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ID, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| dynamo_error("failed to get task", e))?;

        Ok(output.item.filter(|item| !item.is_empty()))
    }

}

#[async_trait]
impl TaskStore for DynamoTaskStore {
    async fn list_tasks(&self) -> TaskStoreResult<Vec<Task>> {
        self.scan(None).await
    }

    async fn get_task(&self, id: &str) -> TaskStoreResult<Option<Task>> {
        self.get_item(id)
            .await?
            .map(|item| task_from_item(&item))
            .transpose()
    }

    async fn list_tasks_by_user(&self, user_id: &str) -> TaskStoreResult<Vec<Task>> {
        self.scan(Some(user_id)).await
    }

    async fn create_task(&self, task: &Task) -> TaskStoreResult<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(task_to_item(task)))
            .send()
            .await
            .map_err(|e| dynamo_error("failed to create task", e))?;
        tracing::debug!(task_id = %task.id, table = %self.table_name, "Put task item");
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> TaskStoreResult<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(task_to_item(task)))
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#id", ID)
            .send()
            .await
            .map_err(|e| {
                if is_missing_item(e.as_service_error()) {
                    TaskStoreError::not_found("Task", task.id.clone())
                } else {
                    dynamo_error("failed to update task", e)
                }
            })?;
        tracing::debug!(task_id = %task.id, table = %self.table_name, "Replaced task item");
        Ok(())
    }

    async fn delete_task(&self, id: &str) -> TaskStoreResult<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(ID, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| dynamo_error("failed to delete task", e))?;
        Ok(())
    }
}

/// True when a conditional put found no item to replace.
fn is_missing_item(err: Option<&PutItemError>) -> bool {
    err.is_some_and(PutItemError::is_conditional_check_failed_exception)
}

fn optional_string(value: &Option<String>) -> AttributeValue {
    match value {
        Some(s) => AttributeValue::S(s.clone()),
        None => AttributeValue::Null(true),
    }
}

/// Converts a task into a DynamoDB item.
pub(crate) fn task_to_item(task: &Task) -> Item {
    HashMap::from([
        (ID.to_string(), AttributeValue::S(task.id.clone())),
        (USER_ID.to_string(), AttributeValue::S(task.user_id.clone())),
        (BODY.to_string(), AttributeValue::S(task.body.clone())),
        (COMPLETED.to_string(), AttributeValue::Bool(task.completed)),
        (PARENT.to_string(), optional_string(&task.parent)),
        (REMINDER.to_string(), optional_string(&task.reminder)),
    ])
}

fn read_string(item: &Item, name: &str) -> TaskStoreResult<Option<String>> {
    match item.get(name) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(AttributeValue::S(s)) => Ok(Some(s.clone())),
        Some(other) => Err(TaskStoreError::Serialization(format!(
            "attribute {} is not a string: {:?}",
            name, other
        ))),
    }
}

/// Converts a DynamoDB item into a task. Missing attributes take their
/// empty value; only `id` is required.
pub(crate) fn task_from_item(item: &Item) -> TaskStoreResult<Task> {
    let id = read_string(item, ID)?
        .ok_or_else(|| TaskStoreError::Serialization("item has no id attribute".to_string()))?;

    let completed = match item.get(COMPLETED) {
        None | Some(AttributeValue::Null(_)) => false,
        Some(AttributeValue::Bool(b)) => *b,
        Some(other) => {
            return Err(TaskStoreError::Serialization(format!(
                "attribute {} is not a boolean: {:?}",
                COMPLETED, other
            )))
        }
    };

    Ok(Task {
        id,
        user_id: read_string(item, USER_ID)?.unwrap_or_default(),
        body: read_string(item, BODY)?.unwrap_or_default(),
        completed,
        parent: read_string(item, PARENT)?,
        reminder: read_string(item, REMINDER)?,
    })
}
