//! End-to-end coaching flows against the in-memory backend.

mod support;

use coachtrack::db::models::{Role, SessionStatus};
use coachtrack::db::services as db_services;
use coachtrack::models::DateRange;
use coachtrack::scheduler::MatchPolicy;
use coachtrack::services::{self, progress::ProgressInput, ServiceError};
use support::{coach_with_athlete, date, local_backend, register, rule};

#[tokio::test]
async fn test_coach_plans_and_tracks_an_athlete() {
    let (repo, auth) = local_backend();
    let (coach, athlete) = coach_with_athlete(&repo, &auth).await;
    assert_eq!(athlete.coach_id, Some(coach.id));

    // The coach writes the weekly plan.
    services::ensure_athlete_access(&repo, coach.id, athlete.id)
        .await
        .unwrap();
    db_services::create_schedule_rule(&repo, athlete.id, rule(1, "18:00", "19:30", "practice"))
        .await
        .unwrap();
    db_services::create_schedule_rule(&repo, athlete.id, rule(3, "18:00", "19:00", " intervals "))
        .await
        .unwrap();

    let rules = db_services::list_schedule_rules(&repo, athlete.id).await.unwrap();
    assert_eq!(rules.len(), 2);
    assert!(rules.iter().any(|r| r.session_type == "intervals"));

    // 2024-01-01 is a Monday: two Mondays and two Wednesdays in the fortnight.
    let range = DateRange::parse("2024-01-01", "2024-01-14").unwrap();
    let report = services::generate_sessions(&repo, athlete.id, range, MatchPolicy::FirstMatch)
        .await
        .unwrap();
    assert_eq!(report.requested, 4);
    assert_eq!(report.skipped_existing, 0);
    let dates: Vec<String> = report
        .sessions
        .iter()
        .map(|s| s.scheduled_date.to_string())
        .collect();
    assert_eq!(dates, ["2024-01-01", "2024-01-03", "2024-01-08", "2024-01-10"]);

    let again = services::generate_sessions(&repo, athlete.id, range, MatchPolicy::FirstMatch)
        .await
        .unwrap();
    assert_eq!(again.requested, 4);
    assert_eq!(again.skipped_existing, 4);
    assert!(again.sessions.is_empty());
    assert_eq!(repo.session_count(), 4);

    // The athlete reports on the first week.
    let first = &report.sessions[0];
    let second = &report.sessions[1];
    let done = services::update_session_status(
        &repo,
        first.id,
        Some(SessionStatus::Completed),
        Some("felt strong".to_string()),
    )
    .await
    .unwrap();
    assert_eq!(done.status, SessionStatus::Completed);
    assert_eq!(done.notes.as_deref(), Some("felt strong"));
    services::update_session_status(&repo, second.id, Some(SessionStatus::Missed), None)
        .await
        .unwrap();

    services::record_progress(
        &repo,
        athlete.id,
        ProgressInput {
            recorded_on: date("2024-01-05"),
            metric: "5k_time_minutes".to_string(),
            value: 24.5,
            notes: None,
        },
    )
    .await
    .unwrap();

    let today = date("2024-01-08");
    let coach_view = services::coach_dashboard(&repo, coach.id, today).await.unwrap();
    assert_eq!(coach_view.coach.id, coach.id);
    assert_eq!(coach_view.sessions_today, 1);
    assert_eq!(coach_view.athletes.len(), 1);
    let summary = &coach_view.athletes[0];
    assert_eq!(summary.profile.id, athlete.id);
    assert_eq!(summary.upcoming_sessions, 2);
    assert_eq!(summary.stats.total, 3);
    assert_eq!(summary.stats.completed, 1);

    let athlete_view = services::athlete_dashboard(&repo, athlete.id, today).await.unwrap();
    assert_eq!(athlete_view.upcoming.len(), 2);
    assert_eq!(athlete_view.stats, summary.stats);
    assert_eq!(athlete_view.recent_progress.len(), 1);
    assert_eq!(athlete_view.recent_progress[0].metric, "5k_time_minutes");
}

#[tokio::test]
async fn test_unlinked_coach_is_forbidden() {
    let (repo, auth) = local_backend();
    let (_, athlete) = coach_with_athlete(&repo, &auth).await;
    let stranger = register(&repo, &auth, "other@example.com", "Other Coach", Role::Coach).await;

    let err = services::ensure_athlete_access(&repo, stranger.id, athlete.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let dashboard = services::coach_dashboard(&repo, stranger.id, date("2024-01-08"))
        .await
        .unwrap();
    assert!(dashboard.athletes.is_empty());
    assert_eq!(dashboard.sessions_today, 0);
}

#[tokio::test]
async fn test_athlete_cannot_open_coach_dashboard() {
    let (repo, auth) = local_backend();
    let (_, athlete) = coach_with_athlete(&repo, &auth).await;

    let err = services::coach_dashboard(&repo, athlete.id, date("2024-01-08"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_relinking_moves_athlete_to_new_coach() {
    let (repo, auth) = local_backend();
    let (first_coach, athlete) = coach_with_athlete(&repo, &auth).await;
    let second_coach =
        register(&repo, &auth, "second@example.com", "Second Coach", Role::Coach).await;

    let moved =
        services::link_athlete_to_coach(&repo, athlete.id, &second_coach.user_code.to_lowercase())
            .await
            .unwrap();
    assert_eq!(moved.coach_id, Some(second_coach.id));

    assert!(services::ensure_athlete_access(&repo, first_coach.id, athlete.id)
        .await
        .is_err());
    assert!(services::ensure_athlete_access(&repo, second_coach.id, athlete.id)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_invalid_rules_are_rejected_before_storage() {
    let (repo, auth) = local_backend();
    let (_, athlete) = coach_with_athlete(&repo, &auth).await;

    for bad in [
        rule(7, "18:00", "19:00", "practice"),
        rule(2, "19:00", "18:00", "practice"),
        rule(2, "18:00", "19:00", "   "),
    ] {
        assert!(db_services::create_schedule_rule(&repo, athlete.id, bad)
            .await
            .is_err());
    }
    assert!(db_services::list_schedule_rules(&repo, athlete.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_user_codes_are_unique_per_account() {
    let (repo, auth) = local_backend();
    let mut codes = std::collections::HashSet::new();
    for i in 0..20 {
        let profile = register(
            &repo,
            &auth,
            &format!("user{}@example.com", i),
            "Someone",
            Role::Athlete,
        )
        .await;
        assert!(services::UserCode::parse(&profile.user_code).is_ok());
        assert!(codes.insert(profile.user_code));
    }
    assert_eq!(repo.profile_count(), 20);
}
