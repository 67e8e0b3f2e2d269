//! Training session repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::{
    DateRange, NewTrainingSession, SessionId, SessionUpdate, TrainingSession, UserId,
};

/// Repository trait for dated training sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert many sessions in a single call.
    ///
    /// # Returns
    /// * `Ok(Vec<TrainingSession>)` - Inserted rows with assigned ids, in input order
    async fn insert_sessions(
        &self,
        sessions: &[NewTrainingSession],
    ) -> RepositoryResult<Vec<TrainingSession>>;

    /// Sessions of an athlete, optionally restricted to a date range,
    /// ordered by date then start time.
    async fn list_sessions(
        &self,
        athlete_id: UserId,
        range: Option<DateRange>,
    ) -> RepositoryResult<Vec<TrainingSession>>;

    /// Retrieve a single session.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the session doesn't exist
    async fn get_session(&self, session_id: SessionId) -> RepositoryResult<TrainingSession>;

    /// Apply a partial update and return the updated row.
    async fn update_session(
        &self,
        session_id: SessionId,
        update: &SessionUpdate,
    ) -> RepositoryResult<TrainingSession>;
}
