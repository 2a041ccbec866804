//! API endpoints.

pub mod task;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use task_store::TaskStore;

use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

/// Creates the API router with all endpoints.
///
/// Task routes sit behind the auth guard; the health check does not.
pub fn create_router<S: TaskStore + 'static>(
    state: Arc<AppState<S>>,
) -> Router<Arc<AppState<S>>> {
    let tasks = Router::new()
        .route(
            "/tasks",
            get(task::get_tasks)
                .post(task::create_task)
                .put(task::update_task)
                .delete(task::delete_task)
                .fallback(task::method_not_allowed),
        )
        // Sub-path aliases kept for older clients
        .route(
            "/tasks/create",
            post(task::create_task).fallback(task::method_not_allowed),
        )
        .route(
            "/tasks/update",
            put(task::update_task).fallback(task::method_not_allowed),
        )
        .route(
            "/tasks/delete",
            delete(task::delete_task).fallback(task::method_not_allowed),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware::<S>));

    Router::new()
        .merge(tasks)
        // Health check
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
