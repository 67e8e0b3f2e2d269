//! Progress entry repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::{NewProgressEntry, ProgressEntry, UserId};

/// Repository trait for progress measurements.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Store a measurement and return it with its assigned id.
    async fn record_progress(&self, entry: &NewProgressEntry) -> RepositoryResult<ProgressEntry>;

    /// Measurements of an athlete, newest first, at most `limit` when given.
    async fn list_progress(
        &self,
        athlete_id: UserId,
        limit: Option<usize>,
    ) -> RepositoryResult<Vec<ProgressEntry>>;
}
