//! Task API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use entities::Task;
use task_store::TaskStore;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Query parameters accepted by `GET /tasks`.
///
/// A repeated key keeps its first value. Empty values count as absent.
#[derive(Debug, Default)]
pub struct TaskQuery {
    /// Look up a single task.
    pub id: Option<String>,
    /// List the tasks owned by a user.
    pub user_id: Option<String>,
}

impl TaskQuery {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "id" => &mut query.id,
                "user_id" => &mut query.user_id,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|s| !s.is_empty())
    }

    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|s| !s.is_empty())
    }
}

fn decode_task(body: &[u8]) -> ServerResult<Task> {
    serde_json::from_slice(body).map_err(|e| ServerError::InvalidRequest(e.to_string()))
}

fn task_not_found() -> ServerError {
    ServerError::NotFound("Task not found".to_string())
}

/// Lists tasks, or dispatches to a lookup by ID or by owner.
pub async fn get_tasks<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ServerResult<Response> {
    let Query(pairs) = query.map_err(|e| ServerError::InvalidRequest(e.body_text()))?;
    let query = TaskQuery::from_pairs(pairs);

    match (query.id(), query.user_id()) {
        (Some(_), Some(_)) => Err(ServerError::InvalidRequest(
            "Cannot query by both id and user".to_string(),
        )),
        (Some(id), None) => get_task_by_id(&state.store, id)
            .await
            .map(IntoResponse::into_response),
        (None, Some(user_id)) => get_tasks_by_user(&state.store, user_id)
            .await
            .map(IntoResponse::into_response),
        (None, None) => {
            let tasks = state.store.list_tasks().await?;
            tracing::debug!(count = tasks.len(), "Listed tasks");
            Ok(Json(tasks).into_response())
        }
    }
}

/// Gets a single task by ID.
pub async fn get_task_by_id<S: TaskStore>(store: &S, id: &str) -> ServerResult<Json<Task>> {
    let task = store.get_task(id).await?.ok_or_else(task_not_found)?;
    Ok(Json(task))
}

/// Lists the tasks owned by a user. No match yields an empty array.
pub async fn get_tasks_by_user<S: TaskStore>(
    store: &S,
    user_id: &str,
) -> ServerResult<Json<Vec<Task>>> {
    let tasks = store.list_tasks_by_user(user_id).await?;
    tracing::debug!(user_id = %user_id, count = tasks.len(), "Listed tasks for user");
    Ok(Json(tasks))
}

/// Creates a task from the JSON body.
pub async fn create_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> ServerResult<(StatusCode, &'static str)> {
    let task = decode_task(&body)?;

    state.store.create_task(&task).await?;

    tracing::info!(task_id = %task.id, "Task created");

    Ok((StatusCode::CREATED, "Task created successfully"))
}

/// Replaces an existing task with the JSON body.
pub async fn update_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> ServerResult<(StatusCode, &'static str)> {
    let task = decode_task(&body)?;

    state.store.update_task(&task).await.map_err(|e| {
        if e.is_not_found() {
            tracing::warn!(task_id = %task.id, "Update of unknown task");
            task_not_found()
        } else {
            e.into()
        }
    })?;

    tracing::info!(task_id = %task.id, "Task updated");

    Ok((StatusCode::OK, "Task updated successfully"))
}

/// Deletes the task named by the `id` of the JSON body.
pub async fn delete_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> ServerResult<(StatusCode, &'static str)> {
    let task = decode_task(&body)?;

    state.store.delete_task(&task.id).await?;

    tracing::info!(task_id = %task.id, "Task deleted");

    Ok((StatusCode::OK, "Task deleted successfully"))
}

/// Rejects verbs `/tasks` does not serve.
pub async fn method_not_allowed() -> ServerError {
    ServerError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, header::CONTENT_TYPE},
    };
    use mockall::predicate::eq;
    use task_store::{MockTaskStore, TaskStoreError};
    use tower::ServiceExt;

    use super::*;
    use crate::{config::Config, create_app, create_state};

    struct TestResponse {
        status: StatusCode,
        content_type: Option<String>,
        body: String,
    }

    fn app(store: MockTaskStore) -> Router {
        create_app(create_state(Config::default(), store))
    }

    async fn send(router: Router, method: Method, uri: &str, body: Option<String>) -> TestResponse {
        let body = body.map(Body::from).unwrap_or_else(Body::empty);
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            content_type,
            body: String::from_utf8(body.to_vec()).unwrap(),
        }
    }

    fn json(task: &Task) -> Option<String> {
        Some(serde_json::to_string(task).unwrap())
    }

    fn database_error() -> TaskStoreError {
        TaskStoreError::DynamoDb("connection refused".to_string())
    }

    fn sample_tasks() -> Vec<Task> {
        vec![
            Task::new("1", "Task 1"),
            Task::new("2", "Task 2").with_completed(true),
        ]
    }

    #[tokio::test]
    async fn test_get_tasks_success() {
        let mut store = MockTaskStore::new();
        store
            .expect_list_tasks()
            .times(1)
            .returning(|| Ok(sample_tasks()));

        let response = send(app(store), Method::GET, "/tasks", None).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.content_type.as_deref(), Some("application/json"));
        let tasks: Vec<Task> = serde_json::from_str(&response.body).unwrap();
        assert_eq!(tasks, sample_tasks());
    }

    #[tokio::test]
    async fn test_get_tasks_error() {
        let mut store = MockTaskStore::new();
        store
            .expect_list_tasks()
            .times(1)
            .returning(|| Err(database_error()));

        let response = send(app(store), Method::GET, "/tasks", None).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body, "DynamoDB error: connection refused\n");
    }

    #[tokio::test]
    async fn test_get_task_by_id_success() {
        let mut store = MockTaskStore::new();
        store
            .expect_get_task()
            .with(eq("1"))
            .times(1)
            .returning(|_| Ok(Some(Task::new("1", "Task 1"))));

        let response = send(app(store), Method::GET, "/tasks?id=1", None).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.content_type.as_deref(), Some("application/json"));
        let task: Task = serde_json::from_str(&response.body).unwrap();
        assert_eq!(task, Task::new("1", "Task 1"));
    }

    #[tokio::test]
    async fn test_get_task_by_id_not_found() {
        let mut store = MockTaskStore::new();
        store
            .expect_get_task()
            .with(eq("1"))
            .times(1)
            .returning(|_| Ok(None));

        let response = send(app(store), Method::GET, "/tasks?id=1", None).await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, "Task not found\n");
        assert_ne!(response.content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_get_task_by_id_error() {
        let mut store = MockTaskStore::new();
        store
            .expect_get_task()
            .with(eq("1"))
            .times(1)
            .returning(|_| Err(database_error()));

        let response = send(app(store), Method::GET, "/tasks?id=1", None).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_tasks_by_user_success() {
        let mut store = MockTaskStore::new();
        store
            .expect_list_tasks_by_user()
            .with(eq("1"))
            .times(1)
            .returning(|_| Ok(sample_tasks()));

        let response = send(app(store), Method::GET, "/tasks?user_id=1", None).await;

        assert_eq!(response.status, StatusCode::OK);
        let tasks: Vec<Task> = serde_json::from_str(&response.body).unwrap();
        assert_eq!(tasks, sample_tasks());
    }

    #[tokio::test]
    async fn test_get_tasks_by_user_empty() {
        let mut store = MockTaskStore::new();
        store
            .expect_list_tasks_by_user()
            .with(eq("nobody"))
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let response = send(app(store), Method::GET, "/tasks?user_id=nobody", None).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "[]");
    }

    #[tokio::test]
    async fn test_get_tasks_by_user_error() {
        let mut store = MockTaskStore::new();
        store
            .expect_list_tasks_by_user()
            .times(1)
            .returning(|_| Err(database_error()));

        let response = send(app(store), Method::GET, "/tasks?user_id=1", None).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_tasks_by_user_and_id_is_rejected() {
        // No expectations: any store call panics.
        let store = MockTaskStore::new();

        let response = send(app(store), Method::GET, "/tasks?user_id=1&id=1", None).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, "Cannot query by both id and user\n");
    }

    #[tokio::test]
    async fn test_empty_query_values_are_ignored() {
        let mut store = MockTaskStore::new();
        store
            .expect_get_task()
            .with(eq("1"))
            .times(1)
            .returning(|_| Ok(Some(Task::new("1", "Task 1"))));

        let response = send(app(store), Method::GET, "/tasks?id=1&user_id=", None).await;

        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_duplicate_query_param() {
        let mut store = MockTaskStore::new();
        store
            .expect_get_task()
            .with(eq("1"))
            .times(1)
            .returning(|_| Ok(Some(Task::new("1", "Task 1"))));

        let response = send(app(store), Method::GET, "/tasks?id=1&id=2", None).await;

        assert_eq!(response.status, StatusCode::OK);
        let task: Task = serde_json::from_str(&response.body).unwrap();
        assert_eq!(task.id, "1");
    }

    #[test]
    fn test_query_keeps_first_value() {
        let pairs = vec![
            ("user_id".to_string(), "a".to_string()),
            ("page".to_string(), "2".to_string()),
            ("user_id".to_string(), "b".to_string()),
            ("id".to_string(), String::new()),
            ("id".to_string(), "7".to_string()),
        ];
        let query = TaskQuery::from_pairs(pairs);

        assert_eq!(query.user_id(), Some("a"));
        assert_eq!(query.id(), None);
    }

    #[tokio::test]
    async fn test_create_task_success() {
        let task = Task::new("1", "Task 1");
        let expected = task.clone();
        let mut store = MockTaskStore::new();
        store
            .expect_create_task()
            .withf(move |t| *t == expected)
            .times(1)
            .returning(|_| Ok(()));

        let response = send(app(store), Method::POST, "/tasks", json(&task)).await;

        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body, "Task created successfully");
        assert_ne!(response.content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_create_task_error() {
        let mut store = MockTaskStore::new();
        store
            .expect_create_task()
            .times(1)
            .returning(|_| Err(database_error()));

        let response = send(
            app(store),
            Method::POST,
            "/tasks",
            json(&Task::new("1", "Task 1")),
        )
        .await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body, "DynamoDB error: connection refused\n");
    }

    #[tokio::test]
    async fn test_create_task_malformed_body() {
        let store = MockTaskStore::new();

        let response = send(
            app(store),
            Method::POST,
            "/tasks",
            Some("{not json".to_string()),
        )
        .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(!response.body.is_empty());
    }

    #[tokio::test]
    async fn test_update_task_success() {
        let task = Task::new("1", "Task 1");
        let expected = task.clone();
        let mut store = MockTaskStore::new();
        store
            .expect_update_task()
            .withf(move |t| *t == expected)
            .times(1)
            .returning(|_| Ok(()));

        let response = send(app(store), Method::PUT, "/tasks", json(&task)).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "Task updated successfully");
    }

    #[tokio::test]
    async fn test_update_task_error() {
        let mut store = MockTaskStore::new();
        store
            .expect_update_task()
            .times(1)
            .returning(|_| Err(database_error()));

        let response = send(
            app(store),
            Method::PUT,
            "/tasks",
            json(&Task::new("1", "Task 1")),
        )
        .await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_update_unknown_task_is_not_found() {
        let mut store = MockTaskStore::new();
        store
            .expect_update_task()
            .times(1)
            .returning(|t| Err(TaskStoreError::not_found("Task", t.id.clone())));

        let response = send(
            app(store),
            Method::PUT,
            "/tasks",
            json(&Task::new("404", "missing")),
        )
        .await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, "Task not found\n");
    }

    #[tokio::test]
    async fn test_update_task_malformed_body_skips_store() {
        let store = MockTaskStore::new();

        let response = send(app(store), Method::PUT, "/tasks", Some("[]".to_string())).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_task_success() {
        let mut store = MockTaskStore::new();
        store
            .expect_delete_task()
            .with(eq("1"))
            .times(1)
            .returning(|_| Ok(()));

        let response = send(
            app(store),
            Method::DELETE,
            "/tasks",
            Some(r#"{"id":"1"}"#.to_string()),
        )
        .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "Task deleted successfully");
    }

    #[tokio::test]
    async fn test_delete_task_error() {
        let mut store = MockTaskStore::new();
        store
            .expect_delete_task()
            .times(1)
            .returning(|_| Err(database_error()));

        let response = send(
            app(store),
            Method::DELETE,
            "/tasks",
            json(&Task::new("1", "Task 1")),
        )
        .await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_delete_task_without_id() {
        let store = MockTaskStore::new();

        let response = send(
            app(store),
            Method::DELETE,
            "/tasks",
            Some(r#"{"body":"no id"}"#.to_string()),
        )
        .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let store = MockTaskStore::new();

        let response = send(app(store), Method::PATCH, "/tasks", None).await;

        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.body, "Method not allowed\n");
    }

    #[tokio::test]
    async fn test_legacy_create_route() {
        let mut store = MockTaskStore::new();
        store
            .expect_create_task()
            .withf(|t| t.id == "1")
            .times(1)
            .returning(|_| Ok(()));

        let response = send(
            app(store),
            Method::POST,
            "/tasks/create",
            json(&Task::new("1", "Task 1")),
        )
        .await;

        assert_eq!(response.status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_legacy_update_route() {
        let mut store = MockTaskStore::new();
        store
            .expect_update_task()
            .withf(|t| t.id == "1" && t.completed)
            .times(1)
            .returning(|_| Ok(()));

        let response = send(
            app(store),
            Method::PUT,
            "/tasks/update",
            json(&Task::new("1", "Task 1").with_completed(true)),
        )
        .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "Task updated successfully");
    }

    #[tokio::test]
    async fn test_legacy_delete_route() {
        let mut store = MockTaskStore::new();
        store
            .expect_delete_task()
            .with(eq("1"))
            .times(1)
            .returning(|_| Ok(()));

        let response = send(
            app(store),
            Method::DELETE,
            "/tasks/delete",
            Some(r#"{"id":"1"}"#.to_string()),
        )
        .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "Task deleted successfully");
    }

    #[tokio::test]
    async fn test_legacy_route_wrong_method() {
        for (method, uri) in [
            (Method::GET, "/tasks/create"),
            (Method::POST, "/tasks/update"),
            (Method::PUT, "/tasks/delete"),
        ] {
            let response = send(app(MockTaskStore::new()), method, uri, None).await;

            assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED, "{uri}");
            assert_eq!(response.body, "Method not allowed\n", "{uri}");
        }
    }
}
