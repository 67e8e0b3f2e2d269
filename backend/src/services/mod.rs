//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP handlers and the repository/auth
//! collaborators. They validate input, enforce the coach/athlete access rule
//! and orchestrate store calls. All functions are generic over
//! [`FullRepository`](crate::db::FullRepository) so they accept both concrete
//! repositories and `&dyn FullRepository`.

use crate::auth::AuthError;
use crate::db::RepositoryError;

pub mod accounts;
pub mod dashboard;
pub mod progress;
pub mod sessions;
pub mod timezone;
pub mod user_code;

pub use accounts::{ensure_athlete_access, find_by_code, link_athlete_to_coach, register};
pub use dashboard::{athlete_dashboard, coach_dashboard};
pub use progress::{list_progress, record_progress, update_session_status};
pub use sessions::{generate_sessions, preview_sessions, GenerationReport, MAX_RANGE_DAYS};
pub use timezone::{TimezoneDetection, TimezoneResolver, TimezoneSource};
pub use user_code::{generate_user_code, UserCode};

/// Errors raised by the service layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Input rejected before any collaborator was called.
    #[error("{0}")]
    Validation(String),

    /// The caller may not act on the requested resource.
    #[error("{0}")]
    Forbidden(String),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
