//! Row types of the hosted store.
//!
//! Field names match the column names of the `profiles`, `training_schedules`,
//! `training_sessions` and `progress_entries` tables so that the same types
//! decode REST responses and back the in-memory repository.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use crate::models::{
    DateRange, ProgressEntryId, ScheduleRule, ScheduleRuleId, SessionId, SessionRecord,
    SessionStatus, UserId, WallClockTime,
};

// ==================== Profiles ====================

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Coach,
    Athlete,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Coach => "coach",
            Role::Athlete => "athlete",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "coach" => Ok(Self::Coach),
            "athlete" => Ok(Self::Athlete),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Public profile of an authenticated user (`profiles` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Same id as the auth user
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    /// Shareable code used to link athletes to coaches
    pub user_code: String,
    #[serde(default)]
    pub coach_id: Option<UserId>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn is_coach(&self) -> bool {
        self.role == Role::Coach
    }
}

// ==================== Schedules ====================

/// Stored weekly schedule rule for an athlete (`training_schedules` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSchedule {
    pub id: ScheduleRuleId,
    pub athlete_id: UserId,
    pub day_of_week: i32,
    pub start_time: WallClockTime,
    pub end_time: WallClockTime,
    pub session_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TrainingSchedule {
    /// The materializer input carried by this row.
    pub fn rule(&self) -> ScheduleRule {
        ScheduleRule {
            day_of_week: self.day_of_week,
            start_time: self.start_time,
            end_time: self.end_time,
            session_type: self.session_type.clone(),
        }
    }
}

/// Insert payload for a schedule rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrainingSchedule {
    pub athlete_id: UserId,
    pub day_of_week: i32,
    pub start_time: WallClockTime,
    pub end_time: WallClockTime,
    pub session_type: String,
}

impl NewTrainingSchedule {
    pub fn from_rule(athlete_id: UserId, rule: ScheduleRule) -> Self {
        Self {
            athlete_id,
            day_of_week: rule.day_of_week,
            start_time: rule.start_time,
            end_time: rule.end_time,
            session_type: rule.session_type,
        }
    }
}

// ==================== Sessions ====================

/// Concrete dated session (`training_sessions` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: SessionId,
    pub athlete_id: UserId,
    pub scheduled_date: NaiveDate,
    pub start_time: WallClockTime,
    pub end_time: WallClockTime,
    pub session_type: String,
    pub status: SessionStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TrainingSession {
    /// Identity used to detect an already-generated occurrence.
    pub fn slot_key(&self) -> (NaiveDate, WallClockTime, &str) {
        (self.scheduled_date, self.start_time, self.session_type.as_str())
    }
}

/// Insert payload for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrainingSession {
    pub athlete_id: UserId,
    pub scheduled_date: NaiveDate,
    pub start_time: WallClockTime,
    pub end_time: WallClockTime,
    pub session_type: String,
    pub status: SessionStatus,
}

impl NewTrainingSession {
    pub fn from_record(athlete_id: UserId, record: &SessionRecord) -> Self {
        Self {
            athlete_id,
            scheduled_date: record.scheduled_date,
            start_time: record.start_time,
            end_time: record.end_time,
            session_type: record.session_type.clone(),
            status: record.status,
        }
    }
}

/// Partial update of a session; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SessionUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.notes.is_none()
    }
}

// ==================== Progress ====================

/// A single measured data point for an athlete (`progress_entries` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: ProgressEntryId,
    pub athlete_id: UserId,
    pub recorded_on: NaiveDate,
    pub metric: String,
    pub value: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Insert payload for a progress entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProgressEntry {
    pub athlete_id: UserId,
    pub recorded_on: NaiveDate,
    pub metric: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
