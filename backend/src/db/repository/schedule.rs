//! Schedule rule repository trait.
//!
//! This trait covers the `training_schedules` table: the weekly templates the
//! session materializer expands.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::{NewTrainingSchedule, ScheduleRuleId, TrainingSchedule, UserId};

/// Repository trait for weekly schedule rules.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Schedule Rules ====================

    /// All schedule rules of an athlete, ordered by weekday then start time.
    async fn list_schedule_rules(&self, athlete_id: UserId)
        -> RepositoryResult<Vec<TrainingSchedule>>;

    /// Retrieve a single rule.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the rule doesn't exist
    async fn get_schedule_rule(&self, rule_id: ScheduleRuleId) -> RepositoryResult<TrainingSchedule>;

    /// Store a new rule and return it with its assigned id.
    async fn create_schedule_rule(
        &self,
        rule: &NewTrainingSchedule,
    ) -> RepositoryResult<TrainingSchedule>;

    /// Delete a rule.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the rule doesn't exist
    async fn delete_schedule_rule(&self, rule_id: ScheduleRuleId) -> RepositoryResult<()>;
}
