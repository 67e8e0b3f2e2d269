//! Progress measurements and session status updates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ServiceError, ServiceResult};
use crate::db::models::{
    NewProgressEntry, ProgressEntry, SessionId, SessionStatus, SessionUpdate, TrainingSession,
    UserId,
};
use crate::db::FullRepository;

/// A measurement to record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressInput {
    pub recorded_on: NaiveDate,
    pub metric: String,
    pub value: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Record a measurement for an athlete. The metric must be non-empty and the
/// value finite.
pub async fn record_progress<R: FullRepository + ?Sized>(
    repo: &R,
    athlete_id: UserId,
    input: ProgressInput,
) -> ServiceResult<ProgressEntry> {
    let metric = input.metric.trim();
    if metric.is_empty() {
        return Err(ServiceError::validation("metric must not be empty"));
    }
    if !input.value.is_finite() {
        return Err(ServiceError::validation("value must be a finite number"));
    }

    let entry = NewProgressEntry {
        athlete_id,
        recorded_on: input.recorded_on,
        metric: metric.to_string(),
        value: input.value,
        notes: normalize_notes(input.notes),
    };
    Ok(repo.record_progress(&entry).await?)
}

/// Most recent measurements first.
pub async fn list_progress<R: FullRepository + ?Sized>(
    repo: &R,
    athlete_id: UserId,
    limit: Option<usize>,
) -> ServiceResult<Vec<ProgressEntry>> {
    Ok(repo.list_progress(athlete_id, limit).await?)
}

/// Change the status and/or notes of a session.
pub async fn update_session_status<R: FullRepository + ?Sized>(
    repo: &R,
    session_id: SessionId,
    status: Option<SessionStatus>,
    notes: Option<String>,
) -> ServiceResult<TrainingSession> {
    let update = SessionUpdate {
        status,
        notes: notes.map(|n| n.trim().to_string()),
    };
    if update.is_empty() {
        return Err(ServiceError::validation(
            "nothing to update: provide status or notes",
        ));
    }

    let session = repo.update_session(session_id, &update).await?;
    log::info!("Session {} is now {}", session.id, session.status);
    Ok(session)
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}
