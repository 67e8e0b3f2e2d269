//! Repository-level service functions.
//!
//! Thin wrappers over the repository traits that add input validation and
//! logging. They work with any [`FullRepository`] implementation, including
//! `&dyn FullRepository`.

use super::models::{
    DateRange, NewTrainingSchedule, ScheduleRule, ScheduleRuleId, TrainingSchedule,
    TrainingSession, UserId,
};
use super::repository::{FullRepository, RepositoryError, RepositoryResult};

/// Check if the store is reachable.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Validate a schedule rule before it is stored.
///
/// The materializer itself tolerates any `day_of_week`; stored rules are
/// held to 0..=6, a non-empty session type and an end after the start.
pub fn validate_schedule_rule(rule: &ScheduleRule) -> RepositoryResult<()> {
    if !(0..=6).contains(&rule.day_of_week) {
        return Err(RepositoryError::validation(format!(
            "day_of_week must be between 0 (Sunday) and 6 (Saturday), got {}",
            rule.day_of_week
        )));
    }
    if rule.end_time <= rule.start_time {
        return Err(RepositoryError::validation(format!(
            "end_time {} must be after start_time {}",
            rule.end_time, rule.start_time
        )));
    }
    if rule.session_type.trim().is_empty() {
        return Err(RepositoryError::validation("session_type must not be empty"));
    }
    Ok(())
}

/// All schedule rules of an athlete.
pub async fn list_schedule_rules<R: FullRepository + ?Sized>(
    repo: &R,
    athlete_id: UserId,
) -> RepositoryResult<Vec<TrainingSchedule>> {
    repo.list_schedule_rules(athlete_id).await
}

/// Validate and store a schedule rule.
pub async fn create_schedule_rule<R: FullRepository + ?Sized>(
    repo: &R,
    athlete_id: UserId,
    mut rule: ScheduleRule,
) -> RepositoryResult<TrainingSchedule> {
    validate_schedule_rule(&rule)?;
    rule.session_type = rule.session_type.trim().to_string();

    let stored = repo
        .create_schedule_rule(&NewTrainingSchedule::from_rule(athlete_id, rule))
        .await?;
    log::info!(
        "Created schedule rule {} for athlete {} (day {} {}-{})",
        stored.id,
        athlete_id,
        stored.day_of_week,
        stored.start_time,
        stored.end_time
    );
    Ok(stored)
}

/// Delete a schedule rule. Sessions already generated from it are kept.
pub async fn delete_schedule_rule<R: FullRepository + ?Sized>(
    repo: &R,
    rule_id: ScheduleRuleId,
) -> RepositoryResult<()> {
    repo.delete_schedule_rule(rule_id).await?;
    log::info!("Deleted schedule rule {}", rule_id);
    Ok(())
}

/// Sessions of an athlete, optionally restricted to a date range.
pub async fn list_sessions<R: FullRepository + ?Sized>(
    repo: &R,
    athlete_id: UserId,
    range: Option<DateRange>,
) -> RepositoryResult<Vec<TrainingSession>> {
    if let Some(range) = range {
        if range.is_empty() {
            return Ok(Vec::new());
        }
    }
    repo.list_sessions(athlete_id, range).await
}
