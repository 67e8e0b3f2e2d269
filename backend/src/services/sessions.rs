//! Session generation: materialize an athlete's weekly rules into dated
//! sessions and persist the ones that do not exist yet.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{ServiceError, ServiceResult};
use crate::db::models::{
    DateRange, NewTrainingSession, ScheduleRule, SessionRecord, TrainingSession, UserId,
};
use crate::db::FullRepository;
use crate::scheduler::{materialize_with, MatchPolicy};

/// Outcome of [`generate_sessions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Records produced by the materializer for the range
    pub requested: usize,
    /// Records skipped because the session already existed
    pub skipped_existing: usize,
    /// Newly inserted sessions
    pub sessions: Vec<TrainingSession>,
}

/// Longest range, in days, that one preview or generation request may span.
pub const MAX_RANGE_DAYS: usize = 366;

fn check_span(range: &DateRange) -> ServiceResult<()> {
    let days = range.num_days();
    if days > MAX_RANGE_DAYS {
        return Err(ServiceError::validation(format!(
            "date range {}..{} spans {} days, at most {} allowed",
            range.start_date, range.end_date, days, MAX_RANGE_DAYS
        )));
    }
    Ok(())
}

/// Pure preview of the sessions a rule set produces over `range`.
pub fn preview_sessions(
    rules: &[ScheduleRule],
    range: &DateRange,
    policy: MatchPolicy,
) -> ServiceResult<Vec<SessionRecord>> {
    check_span(range)?;
    Ok(materialize_with(rules, range, policy))
}

/// Materialize the athlete's stored rules over `range` and insert the
/// sessions that are not already stored.
///
/// A session counts as existing when the athlete already has one with the
/// same date, start time and session type, so running this twice over the
/// same range inserts nothing the second time. Ranges longer than
/// [`MAX_RANGE_DAYS`] are rejected before the store is touched.
pub async fn generate_sessions<R: FullRepository + ?Sized>(
    repo: &R,
    athlete_id: UserId,
    range: DateRange,
    policy: MatchPolicy,
) -> ServiceResult<GenerationReport> {
    check_span(&range)?;
    let rules: Vec<ScheduleRule> = repo
        .list_schedule_rules(athlete_id)
        .await?
        .iter()
        .map(|row| row.rule())
        .collect();

    let records = materialize_with(&rules, &range, policy);
    if records.is_empty() {
        log::debug!(
            "No sessions to generate for athlete {} in {}..{}",
            athlete_id,
            range.start_date,
            range.end_date
        );
        return Ok(GenerationReport {
            requested: 0,
            skipped_existing: 0,
            sessions: Vec::new(),
        });
    }

    let existing = repo.list_sessions(athlete_id, Some(range)).await?;
    let taken: HashSet<_> = existing.iter().map(TrainingSession::slot_key).collect();

    let fresh: Vec<NewTrainingSession> = records
        .iter()
        .filter(|r| !taken.contains(&(r.scheduled_date, r.start_time, r.session_type.as_str())))
        .map(|r| NewTrainingSession::from_record(athlete_id, r))
        .collect();

    let skipped_existing = records.len() - fresh.len();
    let sessions = if fresh.is_empty() {
        Vec::new()
    } else {
        repo.insert_sessions(&fresh).await?
    };

    log::info!(
        "Generated {} sessions for athlete {} ({} already present)",
        sessions.len(),
        athlete_id,
        skipped_existing
    );

    Ok(GenerationReport {
        requested: records.len(),
        skipped_existing,
        sessions,
    })
}

#[cfg(test)]
#[path = "sessions_tests.rs"]
mod tests;
