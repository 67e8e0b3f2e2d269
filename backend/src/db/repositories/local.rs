//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in memory
//! using maps guarded by a single lock, providing fast, deterministic and
//! isolated execution.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::db::models::*;
use crate::db::repository::*;

/// In-memory local repository.
///
/// # Example
/// ```
/// use coachtrack::db::repositories::LocalRepository;
/// use coachtrack::db::repository::ScheduleRepository;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let repo = LocalRepository::new();
///     assert!(repo.health_check().await.unwrap());
/// });
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    profiles: HashMap<UserId, Profile>,
    schedules: BTreeMap<ScheduleRuleId, TrainingSchedule>,
    sessions: BTreeMap<SessionId, TrainingSession>,
    progress: BTreeMap<ProgressEntryId, ProgressEntry>,

    // ID counters
    next_schedule_id: i64,
    next_session_id: i64,
    next_progress_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            profiles: HashMap::new(),
            schedules: BTreeMap::new(),
            sessions: BTreeMap::new(),
            progress: BTreeMap::new(),
            next_schedule_id: 1,
            next_session_id: 1,
            next_progress_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };
    }

    /// Number of stored sessions across all athletes.
    pub fn session_count(&self) -> usize {
        self.data.read().sessions.len()
    }

    /// Number of stored profiles.
    pub fn profile_count(&self) -> usize {
        self.data.read().profiles.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileRepository for LocalRepository {
    async fn create_profile(&self, profile: &Profile) -> RepositoryResult<Profile> {
        self.check_health()?;
        let mut data = self.data.write();

        if data.profiles.contains_key(&profile.id) {
            return Err(RepositoryError::validation(format!(
                "Profile {} already exists",
                profile.id
            ))
            .with_operation("create_profile"));
        }
        if data
            .profiles
            .values()
            .any(|p| p.user_code == profile.user_code)
        {
            return Err(RepositoryError::validation(format!(
                "User code {} already taken",
                profile.user_code
            ))
            .with_operation("create_profile"));
        }

        let mut stored = profile.clone();
        stored.created_at.get_or_insert_with(chrono::Utc::now);
        data.profiles.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_profile(&self, user_id: UserId) -> RepositoryResult<Profile> {
        self.check_health()?;
        self.data
            .read()
            .profiles
            .get(&user_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Profile {} not found", user_id),
                    ErrorContext::new("get_profile").with_entity("profile"),
                )
            })
    }

    async fn find_profile_by_code(&self, user_code: &str) -> RepositoryResult<Option<Profile>> {
        self.check_health()?;
        Ok(self
            .data
            .read()
            .profiles
            .values()
            .find(|p| p.user_code == user_code)
            .cloned())
    }

    async fn list_athletes_for_coach(&self, coach_id: UserId) -> RepositoryResult<Vec<Profile>> {
        self.check_health()?;
        let mut athletes: Vec<Profile> = self
            .data
            .read()
            .profiles
            .values()
            .filter(|p| p.role == Role::Athlete && p.coach_id == Some(coach_id))
            .cloned()
            .collect();
        athletes.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(athletes)
    }

    async fn set_coach(&self, athlete_id: UserId, coach_id: UserId) -> RepositoryResult<Profile> {
        self.check_health()?;
        let mut data = self.data.write();
        let profile = data.profiles.get_mut(&athlete_id).ok_or_else(|| {
            RepositoryError::not_found(format!("Profile {} not found", athlete_id))
                .with_operation("set_coach")
        })?;
        profile.coach_id = Some(coach_id);
        Ok(profile.clone())
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_schedule_rules(
        &self,
        athlete_id: UserId,
    ) -> RepositoryResult<Vec<TrainingSchedule>> {
        self.check_health()?;
        let mut rules: Vec<TrainingSchedule> = self
            .data
            .read()
            .schedules
            .values()
            .filter(|r| r.athlete_id == athlete_id)
            .cloned()
            .collect();
        rules.sort_by_key(|r| (r.day_of_week, r.start_time, r.id));
        Ok(rules)
    }

    async fn get_schedule_rule(&self, rule_id: ScheduleRuleId) -> RepositoryResult<TrainingSchedule> {
        self.check_health()?;
        self.data
            .read()
            .schedules
            .get(&rule_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found(format!("Schedule rule {} not found", rule_id))
                    .with_operation("get_schedule_rule")
            })
    }

    async fn create_schedule_rule(
        &self,
        rule: &NewTrainingSchedule,
    ) -> RepositoryResult<TrainingSchedule> {
        self.check_health()?;
        let mut data = self.data.write();
        let id = ScheduleRuleId::new(data.next_schedule_id);
        data.next_schedule_id += 1;

        let stored = TrainingSchedule {
            id,
            athlete_id: rule.athlete_id,
            day_of_week: rule.day_of_week,
            start_time: rule.start_time,
            end_time: rule.end_time,
            session_type: rule.session_type.clone(),
            created_at: Some(chrono::Utc::now()),
        };
        data.schedules.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete_schedule_rule(&self, rule_id: ScheduleRuleId) -> RepositoryResult<()> {
        self.check_health()?;
        match self.data.write().schedules.remove(&rule_id) {
            Some(_) => Ok(()),
            None => Err(
                RepositoryError::not_found(format!("Schedule rule {} not found", rule_id))
                    .with_operation("delete_schedule_rule"),
            ),
        }
    }
}

#[async_trait]
impl SessionRepository for LocalRepository {
    async fn insert_sessions(
        &self,
        sessions: &[NewTrainingSession],
    ) -> RepositoryResult<Vec<TrainingSession>> {
        self.check_health()?;
        let mut data = self.data.write();
        let mut inserted = Vec::with_capacity(sessions.len());

        for new in sessions {
            let id = SessionId::new(data.next_session_id);
            data.next_session_id += 1;

            let stored = TrainingSession {
                id,
                athlete_id: new.athlete_id,
                scheduled_date: new.scheduled_date,
                start_time: new.start_time,
                end_time: new.end_time,
                session_type: new.session_type.clone(),
                status: new.status,
                notes: None,
            };
            data.sessions.insert(id, stored.clone());
            inserted.push(stored);
        }

        Ok(inserted)
    }

    async fn list_sessions(
        &self,
        athlete_id: UserId,
        range: Option<DateRange>,
    ) -> RepositoryResult<Vec<TrainingSession>> {
        self.check_health()?;
        let mut sessions: Vec<TrainingSession> = self
            .data
            .read()
            .sessions
            .values()
            .filter(|s| s.athlete_id == athlete_id)
            .filter(|s| range.map_or(true, |r| r.contains(s.scheduled_date)))
            .cloned()
            .collect();
        sessions.sort_by_key(|s| (s.scheduled_date, s.start_time, s.id));
        Ok(sessions)
    }

    async fn get_session(&self, session_id: SessionId) -> RepositoryResult<TrainingSession> {
        self.check_health()?;
        self.data
            .read()
            .sessions
            .get(&session_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found(format!("Session {} not found", session_id))
                    .with_operation("get_session")
            })
    }

    async fn update_session(
        &self,
        session_id: SessionId,
        update: &SessionUpdate,
    ) -> RepositoryResult<TrainingSession> {
        self.check_health()?;
        let mut data = self.data.write();
        let session = data.sessions.get_mut(&session_id).ok_or_else(|| {
            RepositoryError::not_found(format!("Session {} not found", session_id))
                .with_operation("update_session")
        })?;

        if let Some(status) = update.status {
            session.status = status;
        }
        if let Some(ref notes) = update.notes {
            session.notes = Some(notes.clone());
        }
        Ok(session.clone())
    }
}

#[async_trait]
impl ProgressRepository for LocalRepository {
    async fn record_progress(&self, entry: &NewProgressEntry) -> RepositoryResult<ProgressEntry> {
        self.check_health()?;
        let mut data = self.data.write();
        let id = ProgressEntryId::new(data.next_progress_id);
        data.next_progress_id += 1;

        let stored = ProgressEntry {
            id,
            athlete_id: entry.athlete_id,
            recorded_on: entry.recorded_on,
            metric: entry.metric.clone(),
            value: entry.value,
            notes: entry.notes.clone(),
        };
        data.progress.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_progress(
        &self,
        athlete_id: UserId,
        limit: Option<usize>,
    ) -> RepositoryResult<Vec<ProgressEntry>> {
        self.check_health()?;
        let mut entries: Vec<ProgressEntry> = self
            .data
            .read()
            .progress
            .values()
            .filter(|e| e.athlete_id == athlete_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.recorded_on.cmp(&a.recorded_on).then(b.id.cmp(&a.id)));
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }
}
