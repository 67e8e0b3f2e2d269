//! Hosted-store repository implementation over the REST interface.
//!
//! Rows are read and written through [`RemoteClient`], one HTTP call per
//! repository operation. Row types decode directly from the REST responses.
//!
//! ## Configuration
//!
//! Built from [`BackendSettings`]:
//! - `COACHTRACK_BACKEND_URL` (or `SUPABASE_URL`): project base URL
//! - `COACHTRACK_BACKEND_KEY` (or `SUPABASE_SERVICE_ROLE_KEY`): API key
//! - `BACKEND_TIMEOUT_SECS`: request timeout (default: 10)

use async_trait::async_trait;
use serde::Serialize;

use crate::config::BackendSettings;
use crate::db::models::{
    DateRange, NewProgressEntry, NewTrainingSchedule, NewTrainingSession, Profile,
    ProgressEntry, ScheduleRuleId, SessionId, SessionUpdate, TrainingSchedule, TrainingSession,
    UserId,
};
use crate::db::repository::{
    ErrorContext, ProfileRepository, ProgressRepository, RepositoryError, RepositoryResult,
    ScheduleRepository, SessionRepository,
};
use crate::remote::{eq, gte, lte, RemoteClient, RemoteError};

const PROFILES: &str = "profiles";
const SCHEDULES: &str = "training_schedules";
const SESSIONS: &str = "training_sessions";
const PROGRESS: &str = "progress_entries";

/// Repository backed by the hosted store.
#[derive(Debug, Clone)]
pub struct RemoteRepository {
    client: RemoteClient,
}

impl RemoteRepository {
    pub fn new(settings: &BackendSettings) -> RepositoryResult<Self> {
        let client = RemoteClient::new(settings)
            .map_err(|e| RepositoryError::configuration(e.to_string()))?;
        log::info!("Remote repository configured for {}", client.base_url());
        Ok(Self { client })
    }

    pub fn from_client(client: RemoteClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    /// Exactly one row is expected back; zero rows is a not-found.
    fn single<T>(rows: Vec<T>, context: ErrorContext) -> RepositoryResult<T> {
        rows.into_iter().next().ok_or_else(|| {
            let entity = context.entity.clone().unwrap_or_else(|| "row".to_string());
            let id = context.entity_id.clone().unwrap_or_default();
            RepositoryError::not_found_with_context(format!("{} {} not found", entity, id), context)
        })
    }
}

fn op_error(operation: &'static str, entity: &'static str) -> impl Fn(RemoteError) -> RepositoryError {
    move |err| {
        RepositoryError::from(err)
            .with_operation(operation)
            .with_entity(entity)
    }
}

// ==================== Profiles ====================

#[async_trait]
impl ProfileRepository for RemoteRepository {
    async fn create_profile(&self, profile: &Profile) -> RepositoryResult<Profile> {
        let rows: Vec<Profile> = self
            .client
            .insert(PROFILES, profile)
            .await
            .map_err(op_error("create_profile", "profile"))?;
        Self::single(
            rows,
            ErrorContext::new("create_profile")
                .with_entity("profile")
                .with_entity_id(profile.id),
        )
    }

    async fn get_profile(&self, user_id: UserId) -> RepositoryResult<Profile> {
        let rows: Vec<Profile> = self
            .client
            .select(PROFILES, &[eq("id", user_id)], None, Some(1))
            .await
            .map_err(op_error("get_profile", "profile"))?;
        Self::single(
            rows,
            ErrorContext::new("get_profile")
                .with_entity("profile")
                .with_entity_id(user_id),
        )
    }

    async fn find_profile_by_code(&self, user_code: &str) -> RepositoryResult<Option<Profile>> {
        let rows: Vec<Profile> = self
            .client
            .select(PROFILES, &[eq("user_code", user_code)], None, Some(1))
            .await
            .map_err(op_error("find_profile_by_code", "profile"))?;
        Ok(rows.into_iter().next())
    }

    async fn list_athletes_for_coach(&self, coach_id: UserId) -> RepositoryResult<Vec<Profile>> {
        self.client
            .select(
                PROFILES,
                &[eq("coach_id", coach_id), eq("role", "athlete")],
                Some("full_name.asc"),
                None,
            )
            .await
            .map_err(op_error("list_athletes_for_coach", "profile"))
    }

    async fn set_coach(&self, athlete_id: UserId, coach_id: UserId) -> RepositoryResult<Profile> {
        #[derive(Serialize)]
        struct CoachPatch {
            coach_id: UserId,
        }

        let rows: Vec<Profile> = self
            .client
            .update(PROFILES, &[eq("id", athlete_id)], &CoachPatch { coach_id })
            .await
            .map_err(op_error("set_coach", "profile"))?;
        Self::single(
            rows,
            ErrorContext::new("set_coach")
                .with_entity("profile")
                .with_entity_id(athlete_id),
        )
    }
}

// ==================== Schedules ====================

#[async_trait]
impl ScheduleRepository for RemoteRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let probe: Result<Vec<serde_json::Value>, RemoteError> =
            self.client.select(PROFILES, &[], None, Some(1)).await;
        match probe {
            Ok(_) => Ok(true),
            Err(RemoteError::Status { status, .. }) => {
                log::warn!("Health probe returned HTTP {}", status);
                Ok(false)
            }
            Err(e) => Err(RepositoryError::from(e).with_operation("health_check")),
        }
    }

    async fn list_schedule_rules(
        &self,
        athlete_id: UserId,
    ) -> RepositoryResult<Vec<TrainingSchedule>> {
        self.client
            .select(
                SCHEDULES,
                &[eq("athlete_id", athlete_id)],
                Some("day_of_week.asc,start_time.asc"),
                None,
            )
            .await
            .map_err(op_error("list_schedule_rules", "training_schedule"))
    }

    async fn get_schedule_rule(
        &self,
        rule_id: ScheduleRuleId,
    ) -> RepositoryResult<TrainingSchedule> {
        let rows: Vec<TrainingSchedule> = self
            .client
            .select(SCHEDULES, &[eq("id", rule_id)], None, Some(1))
            .await
            .map_err(op_error("get_schedule_rule", "training_schedule"))?;
        Self::single(
            rows,
            ErrorContext::new("get_schedule_rule")
                .with_entity("training_schedule")
                .with_entity_id(rule_id),
        )
    }

    async fn create_schedule_rule(
        &self,
        rule: &NewTrainingSchedule,
    ) -> RepositoryResult<TrainingSchedule> {
        let rows: Vec<TrainingSchedule> = self
            .client
            .insert(SCHEDULES, rule)
            .await
            .map_err(op_error("create_schedule_rule", "training_schedule"))?;
        Self::single(
            rows,
            ErrorContext::new("create_schedule_rule").with_entity("training_schedule"),
        )
    }

    async fn delete_schedule_rule(&self, rule_id: ScheduleRuleId) -> RepositoryResult<()> {
        let rows: Vec<TrainingSchedule> = self
            .client
            .delete(SCHEDULES, &[eq("id", rule_id)])
            .await
            .map_err(op_error("delete_schedule_rule", "training_schedule"))?;
        Self::single(
            rows,
            ErrorContext::new("delete_schedule_rule")
                .with_entity("training_schedule")
                .with_entity_id(rule_id),
        )
        .map(|_| ())
    }
}

// ==================== Sessions ====================

#[async_trait]
impl SessionRepository for RemoteRepository {
    async fn insert_sessions(
        &self,
        sessions: &[NewTrainingSession],
    ) -> RepositoryResult<Vec<TrainingSession>> {
        if sessions.is_empty() {
            return Ok(Vec::new());
        }

        let inserted: Vec<TrainingSession> = self
            .client
            .insert(SESSIONS, sessions)
            .await
            .map_err(op_error("insert_sessions", "training_session"))?;

        if inserted.len() != sessions.len() {
            return Err(RepositoryError::DecodeError {
                message: format!(
                    "expected {} inserted rows, store returned {}",
                    sessions.len(),
                    inserted.len()
                ),
                context: ErrorContext::new("insert_sessions").with_entity("training_session"),
            });
        }
        log::debug!("Inserted {} training sessions", inserted.len());
        Ok(inserted)
    }

    async fn list_sessions(
        &self,
        athlete_id: UserId,
        range: Option<DateRange>,
    ) -> RepositoryResult<Vec<TrainingSession>> {
        let mut filters = vec![eq("athlete_id", athlete_id)];
        if let Some(range) = range {
            filters.push(gte("scheduled_date", range.start_date));
            filters.push(lte("scheduled_date", range.end_date));
        }
        self.client
            .select(
                SESSIONS,
                &filters,
                Some("scheduled_date.asc,start_time.asc"),
                None,
            )
            .await
            .map_err(op_error("list_sessions", "training_session"))
    }

    async fn get_session(&self, session_id: SessionId) -> RepositoryResult<TrainingSession> {
        let rows: Vec<TrainingSession> = self
            .client
            .select(SESSIONS, &[eq("id", session_id)], None, Some(1))
            .await
            .map_err(op_error("get_session", "training_session"))?;
        Self::single(
            rows,
            ErrorContext::new("get_session")
                .with_entity("training_session")
                .with_entity_id(session_id),
        )
    }

    async fn update_session(
        &self,
        session_id: SessionId,
        update: &SessionUpdate,
    ) -> RepositoryResult<TrainingSession> {
        if update.is_empty() {
            return self.get_session(session_id).await;
        }
        let rows: Vec<TrainingSession> = self
            .client
            .update(SESSIONS, &[eq("id", session_id)], update)
            .await
            .map_err(op_error("update_session", "training_session"))?;
        Self::single(
            rows,
            ErrorContext::new("update_session")
                .with_entity("training_session")
                .with_entity_id(session_id),
        )
    }
}

// ==================== Progress ====================

#[async_trait]
impl ProgressRepository for RemoteRepository {
    async fn record_progress(&self, entry: &NewProgressEntry) -> RepositoryResult<ProgressEntry> {
        let rows: Vec<ProgressEntry> = self
            .client
            .insert(PROGRESS, entry)
            .await
            .map_err(op_error("record_progress", "progress_entry"))?;
        Self::single(
            rows,
            ErrorContext::new("record_progress").with_entity("progress_entry"),
        )
    }

    async fn list_progress(
        &self,
        athlete_id: UserId,
        limit: Option<usize>,
    ) -> RepositoryResult<Vec<ProgressEntry>> {
        self.client
            .select(
                PROGRESS,
                &[eq("athlete_id", athlete_id)],
                Some("recorded_on.desc,id.desc"),
                limit,
            )
            .await
            .map_err(op_error("list_progress", "progress_entry"))
    }
}
