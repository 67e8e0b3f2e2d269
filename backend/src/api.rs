//! Public API surface for the Rust backend.
//!
//! This file consolidates the domain and row types used by the HTTP API and by
//! library consumers. All types derive Serialize/Deserialize for JSON serialization.

pub use crate::models::DateRange;
pub use crate::models::DateRangeError;
pub use crate::models::InvalidWallClockTime;
pub use crate::models::ProgressEntryId;
pub use crate::models::ScheduleRule;
pub use crate::models::ScheduleRuleId;
pub use crate::models::SessionId;
pub use crate::models::SessionRecord;
pub use crate::models::SessionStatus;
pub use crate::models::UserId;
pub use crate::models::WallClockTime;

pub use crate::db::models::NewProgressEntry;
pub use crate::db::models::NewTrainingSchedule;
pub use crate::db::models::NewTrainingSession;
pub use crate::db::models::Profile;
pub use crate::db::models::ProgressEntry;
pub use crate::db::models::Role;
pub use crate::db::models::SessionUpdate;
pub use crate::db::models::TrainingSchedule;
pub use crate::db::models::TrainingSession;

pub use crate::auth::{AuthRegistration, AuthSession, AuthUser, SignUpMetadata};

pub use crate::scheduler::MatchPolicy;

pub use crate::services::dashboard::{AthleteDashboard, AthleteSummary, CoachDashboard, CompletionStats};
pub use crate::services::sessions::GenerationReport;
pub use crate::services::timezone::{TimezoneDetection, TimezoneSource};
pub use crate::services::user_code::UserCode;
