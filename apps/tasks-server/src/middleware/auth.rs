//! Authentication middleware.

use std::sync::Arc;

use auth::{Claims, JwtManager};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use task_store::TaskStore;

use crate::error::ServerError;
use crate::state::AppState;

/// Authenticated user information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// User ID taken from the token subject.
    pub user_id: String,
}

impl TryFrom<Claims> for AuthenticatedUser {
    type Error = auth::AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: claims.user_id()?.to_string(),
        })
    }
}

/// Extracts the bearer token from the Authorization header.
fn extract_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

fn authenticate(jwt_manager: &JwtManager, token: &str) -> Result<AuthenticatedUser, ServerError> {
    let claims = jwt_manager.validate_token(token)?;
    Ok(AuthenticatedUser::try_from(claims)?)
}

/// Authentication middleware.
///
/// Validates the bearer token and stores the [`AuthenticatedUser`] in the
/// request extensions before calling through. When authentication is
/// disabled the request passes untouched.
pub async fn auth_middleware<S: TaskStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    if !state.auth_enabled() {
        return next.run(request).await;
    }

    let Some(jwt_manager) = &state.jwt_manager else {
        tracing::error!("JWT manager not configured but auth is enabled");
        return ServerError::Internal("Authentication misconfigured".to_string()).into_response();
    };

    let Some(token) = extract_token(&request) else {
        return ServerError::AuthenticationRequired.into_response();
    };

    match authenticate(jwt_manager, token) {
        Ok(user) => {
            request.extensions_mut().insert(user);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected request with invalid token");
            return e.into_response();
        }
    }

    next.run(request).await
}
