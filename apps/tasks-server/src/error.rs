//! Server error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Server error type.
///
/// Rendered as a plain-text body holding the message and a trailing newline.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Malformed body or conflicting query parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unsupported HTTP method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Authentication required.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Authentication error.
    #[error("Auth error: {0}")]
    Auth(#[from] auth::AuthError),

    /// Storage backend error.
    #[error("Storage error: {0}")]
    Storage(#[from] task_store::TaskStoreError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Returns the HTTP status and the client-facing message.
    fn parts(&self) -> (StatusCode, String) {
        match self {
            ServerError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServerError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            ServerError::AuthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                "Missing authorization header".to_string(),
            ),
            ServerError::Auth(_) => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
            ServerError::Storage(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ServerError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }

        (status, format!("{message}\n")).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
