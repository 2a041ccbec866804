//! Application state.

use std::sync::Arc;

use auth::JwtManager;
use task_store::TaskStore;

use crate::config::Config;

/// Shared application state.
///
/// Holds no per-request data; the store provides its own synchronization.
pub struct AppState<S: TaskStore> {
    /// Server configuration.
    pub config: Config,
    /// Task store.
    pub store: S,
    /// JWT manager (only set when authentication is enabled).
    pub jwt_manager: Option<JwtManager>,
}

impl<S: TaskStore> AppState<S> {
    /// Creates new application state.
    pub fn new(config: Config, store: S, jwt_manager: Option<JwtManager>) -> Self {
        Self {
            config,
            store,
            jwt_manager,
        }
    }

    /// Returns true if authentication is enabled.
    pub fn auth_enabled(&self) -> bool {
        self.config.auth_enabled()
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from config and store.
pub fn create_shared_state<S: TaskStore>(
    config: Config,
    store: S,
    jwt_manager: Option<JwtManager>,
) -> SharedState<S> {
    Arc::new(AppState::new(config, store, jwt_manager))
}
