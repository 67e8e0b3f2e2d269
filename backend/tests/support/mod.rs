#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use coachtrack::auth::{AuthProvider, LocalAuthProvider};
use coachtrack::db::models::{Profile, Role, ScheduleRule};
use coachtrack::db::repositories::LocalRepository;
use coachtrack::services::{self, accounts::Registration};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Process environment overrides that are undone on drop.
///
/// Holding the guard also holds a global lock, so tests touching the
/// environment never interleave.
pub struct EnvGuard {
    previous: HashMap<String, Option<String>>,
    _lock: MutexGuard<'static, ()>,
}

/// Apply `changes` (`Some` sets, `None` removes) until the guard is dropped.
pub fn scoped_env(changes: &[(&str, Option<&str>)]) -> EnvGuard {
    let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut previous = HashMap::new();
    for (key, value) in changes {
        previous
            .entry(key.to_string())
            .or_insert_with(|| std::env::var(key).ok());
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
    EnvGuard {
        previous,
        _lock: lock,
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain() {
            match value {
                Some(v) => std::env::set_var(&key, v),
                None => std::env::remove_var(&key),
            }
        }
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn rule(day: i32, start: &str, end: &str, kind: &str) -> ScheduleRule {
    ScheduleRule {
        day_of_week: day,
        start_time: start.parse().unwrap(),
        end_time: end.parse().unwrap(),
        session_type: kind.to_string(),
    }
}

/// Registration payload with a password that passes validation.
pub fn registration(email: &str, name: &str, role: Role) -> Registration {
    Registration {
        email: email.to_string(),
        password: "hunter22".to_string(),
        full_name: name.to_string(),
        role,
        timezone: None,
    }
}

/// In-memory store and auth service.
pub fn local_backend() -> (LocalRepository, LocalAuthProvider) {
    (LocalRepository::new(), LocalAuthProvider::new())
}

/// Register an account and return its profile.
pub async fn register(
    repo: &LocalRepository,
    auth: &dyn AuthProvider,
    email: &str,
    name: &str,
    role: Role,
) -> Profile {
    services::register(repo, auth, &registration(email, name, role))
        .await
        .unwrap()
        .profile
}

/// A coach and one athlete linked to them.
pub async fn coach_with_athlete(
    repo: &LocalRepository,
    auth: &dyn AuthProvider,
) -> (Profile, Profile) {
    let coach = register(repo, auth, "coach@example.com", "Casey Coach", Role::Coach).await;
    let athlete = register(repo, auth, "athlete@example.com", "Alex Athlete", Role::Athlete).await;
    let athlete = services::link_athlete_to_coach(repo, athlete.id, &coach.user_code)
        .await
        .unwrap();
    (coach, athlete)
}
