//! Coach and athlete dashboards.
//!
//! Both dashboards look at two windows around `today`: the upcoming week
//! (`today ..= today + 6`) and the trailing 30 days (`today - 29 ..= today`)
//! used for completion statistics.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{ServiceError, ServiceResult};
use crate::db::models::{
    DateRange, Profile, ProgressEntry, SessionStatus, TrainingSession, UserId,
};
use crate::db::FullRepository;

pub const UPCOMING_DAYS: u32 = 7;
pub const STATS_WINDOW_DAYS: u32 = 30;
pub const RECENT_PROGRESS_LIMIT: usize = 10;

/// Completed vs. total sessions over a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionStats {
    pub completed: usize,
    pub total: usize,
    /// `completed / total`, 0 when there were no sessions
    pub completion_rate: f64,
}

impl CompletionStats {
    pub fn from_sessions<'a>(sessions: impl IntoIterator<Item = &'a TrainingSession>) -> Self {
        let (completed, total) = sessions.into_iter().fold((0, 0), |(done, all), s| {
            let done = done + usize::from(s.status == SessionStatus::Completed);
            (done, all + 1)
        });
        let completion_rate = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64
        };
        Self {
            completed,
            total,
            completion_rate,
        }
    }
}

/// One athlete on a coach's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteSummary {
    pub profile: Profile,
    /// Still-scheduled sessions in the upcoming week
    pub upcoming_sessions: usize,
    pub stats: CompletionStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachDashboard {
    pub coach: Profile,
    pub athletes: Vec<AthleteSummary>,
    /// Sessions dated today across all athletes
    pub sessions_today: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteDashboard {
    pub profile: Profile,
    pub upcoming: Vec<TrainingSession>,
    pub stats: CompletionStats,
    pub recent_progress: Vec<ProgressEntry>,
}

fn upcoming_window(today: NaiveDate) -> DateRange {
    DateRange::starting_at(today, UPCOMING_DAYS)
}

fn stats_window(today: NaiveDate) -> DateRange {
    let start = today
        .checked_sub_days(Days::new(u64::from(STATS_WINDOW_DAYS - 1)))
        .unwrap_or(NaiveDate::MIN);
    DateRange::new(start, today)
}

/// Both windows in one store query.
async fn sessions_around<R: FullRepository + ?Sized>(
    repo: &R,
    athlete_id: UserId,
    today: NaiveDate,
) -> ServiceResult<Vec<TrainingSession>> {
    let span = DateRange::new(stats_window(today).start_date, upcoming_window(today).end_date);
    Ok(repo.list_sessions(athlete_id, Some(span)).await?)
}

pub async fn coach_dashboard<R: FullRepository + ?Sized>(
    repo: &R,
    coach_id: UserId,
    today: NaiveDate,
) -> ServiceResult<CoachDashboard> {
    let coach = repo.get_profile(coach_id).await?;
    if !coach.is_coach() {
        return Err(ServiceError::forbidden("coach dashboard requires a coach account"));
    }

    let upcoming = upcoming_window(today);
    let window = stats_window(today);
    let mut athletes = Vec::new();
    let mut sessions_today = 0;

    for profile in repo.list_athletes_for_coach(coach_id).await? {
        let sessions = sessions_around(repo, profile.id, today).await?;
        sessions_today += sessions
            .iter()
            .filter(|s| s.scheduled_date == today)
            .count();
        let upcoming_sessions = sessions
            .iter()
            .filter(|s| upcoming.contains(s.scheduled_date) && s.status == SessionStatus::Scheduled)
            .count();
        let stats = CompletionStats::from_sessions(
            sessions
                .iter()
                .filter(|s| window.contains(s.scheduled_date)),
        );
        athletes.push(AthleteSummary {
            profile,
            upcoming_sessions,
            stats,
        });
    }

    Ok(CoachDashboard {
        coach,
        athletes,
        sessions_today,
    })
}

pub async fn athlete_dashboard<R: FullRepository + ?Sized>(
    repo: &R,
    athlete_id: UserId,
    today: NaiveDate,
) -> ServiceResult<AthleteDashboard> {
    let profile = repo.get_profile(athlete_id).await?;
    let sessions = sessions_around(repo, athlete_id, today).await?;

    let upcoming_range = upcoming_window(today);
    let window = stats_window(today);
    let stats = CompletionStats::from_sessions(
        sessions
            .iter()
            .filter(|s| window.contains(s.scheduled_date)),
    );
    let upcoming = sessions
        .into_iter()
        .filter(|s| upcoming_range.contains(s.scheduled_date))
        .collect();
    let recent_progress = repo
        .list_progress(athlete_id, Some(RECENT_PROGRESS_LIMIT))
        .await?;

    Ok(AthleteDashboard {
        profile,
        upcoming,
        stats,
        recent_progress,
    })
}
