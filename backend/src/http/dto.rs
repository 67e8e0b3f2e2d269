//! Data Transfer Objects for the HTTP API.
//!
//! Domain types that already derive Serialize/Deserialize are re-exported and
//! used directly; the types here only exist where the wire shape differs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use crate::api::{
    AthleteDashboard, AuthSession, AuthUser, CoachDashboard, GenerationReport, ProgressEntry,
    ScheduleRule, SessionRecord, SessionStatus, TimezoneDetection, TrainingSchedule,
    TrainingSession,
};
pub use crate::services::accounts::{RegisteredAccount, Registration};
pub use crate::services::progress::ProgressInput;
use crate::db::models::{Profile, Role, UserId};
use crate::scheduler::MatchPolicy;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a profile returned by code lookups (no email).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: UserId,
    pub full_name: String,
    pub role: Role,
    pub user_code: String,
}

impl From<Profile> for ProfileSummary {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            full_name: profile.full_name,
            role: profile.role,
            user_code: profile.user_code,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkCoachRequest {
    pub coach_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRuleListResponse {
    pub rules: Vec<TrainingSchedule>,
    pub total: usize,
}

/// Body of `POST /v1/athletes/{athlete_id}/sessions/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSessionsRequest {
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`, inclusive
    pub end_date: String,
    #[serde(default)]
    pub policy: MatchPolicy,
}

/// Body of `POST /v1/sessions/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewSessionsRequest {
    pub rules: Vec<ScheduleRule>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub policy: MatchPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewSessionsResponse {
    pub sessions: Vec<SessionRecord>,
    pub total: usize,
}

/// Optional `from`/`to` filter for session listings; both or neither.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionsQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<TrainingSession>,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSessionRequest {
    #[serde(default)]
    pub status: Option<SessionStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressListResponse {
    pub entries: Vec<ProgressEntry>,
    pub total: usize,
}

/// Dashboards default to the current UTC date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardQuery {
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignOutResponse {
    pub signed_out: bool,
}
