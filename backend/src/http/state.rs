//! Application state for the HTTP server.

use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::db::factory::Backend;
use crate::db::repository::FullRepository;
use crate::services::TimezoneResolver;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for store operations
    pub repository: Arc<dyn FullRepository>,
    /// Auth service of the same backend
    pub auth: Arc<dyn AuthProvider>,
    pub timezone: Arc<TimezoneResolver>,
}

impl AppState {
    pub fn new(backend: Backend, timezone: TimezoneResolver) -> Self {
        Self {
            repository: backend.repository,
            auth: backend.auth,
            timezone: Arc::new(timezone),
        }
    }
}
