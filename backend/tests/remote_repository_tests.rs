//! RemoteRepository against a mocked REST interface.

#![cfg(feature = "remote-backend")]

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coachtrack::config::BackendSettings;
use coachtrack::db::models::{
    DateRange, NewTrainingSession, SessionId, SessionStatus, SessionUpdate, UserId,
};
use coachtrack::db::repositories::RemoteRepository;
use coachtrack::db::{
    ProfileRepository, ProgressRepository, RepositoryError, ScheduleRepository,
    SessionRepository,
};

const ATHLETE: &str = "5b0c2f7e-3f7d-4c8b-9a52-6a1d1f0f9e21";
const COACH: &str = "c0ac4e11-0000-4c8b-9a52-6a1d1f0f9e21";

fn athlete_id() -> UserId {
    ATHLETE.parse().unwrap()
}

fn repository(server: &MockServer) -> RemoteRepository {
    RemoteRepository::new(&BackendSettings::new(server.uri(), "service-key")).unwrap()
}

fn profile_row() -> serde_json::Value {
    json!({
        "id": ATHLETE,
        "email": "athlete@example.com",
        "full_name": "Alex Athlete",
        "role": "athlete",
        "user_code": "A1B2C3D4",
        "coach_id": COACH,
        "timezone": "Europe/Madrid",
        "created_at": "2024-01-01T10:00:00Z"
    })
}

fn session_row(id: i64, day: &str) -> serde_json::Value {
    json!({
        "id": id,
        "athlete_id": ATHLETE,
        "scheduled_date": day,
        "start_time": "18:00:00",
        "end_time": "19:30:00",
        "session_type": "practice",
        "status": "scheduled",
        "notes": null
    })
}

#[tokio::test]
async fn test_get_profile_sends_key_and_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("select", "*"))
        .and(query_param("id", format!("eq.{}", ATHLETE)))
        .and(query_param("limit", "1"))
        .and(header("apikey", "service-key"))
        .and(header("authorization", "Bearer service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([profile_row()])))
        .expect(1)
        .mount(&server)
        .await;

    let profile = repository(&server).get_profile(athlete_id()).await.unwrap();
    assert_eq!(profile.full_name, "Alex Athlete");
    assert_eq!(profile.coach_id, Some(COACH.parse().unwrap()));
    assert_eq!(profile.timezone.as_deref(), Some("Europe/Madrid"));
}

#[tokio::test]
async fn test_missing_row_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let repo = repository(&server);
    let err = repo.get_profile(athlete_id()).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains(ATHLETE));

    assert!(repo.find_profile_by_code("A1B2C3D4").await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_sessions_filters_range_and_orders() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/training_sessions"))
        .and(query_param("athlete_id", format!("eq.{}", ATHLETE)))
        .and(query_param("scheduled_date", "gte.2024-01-01"))
        .and(query_param("order", "scheduled_date.asc,start_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            session_row(1, "2024-01-01"),
            session_row(2, "2024-01-08"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let range = DateRange::parse("2024-01-01", "2024-01-31").unwrap();
    let sessions = repository(&server)
        .list_sessions(athlete_id(), Some(range))
        .await
        .unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[1].id, SessionId::new(2));
    assert_eq!(sessions[0].start_time.to_string(), "18:00");
}

#[tokio::test]
async fn test_insert_sessions_posts_rows_with_representation() {
    let server = MockServer::start().await;
    let new = NewTrainingSession {
        athlete_id: athlete_id(),
        scheduled_date: "2024-01-01".parse().unwrap(),
        start_time: "18:00".parse().unwrap(),
        end_time: "19:30".parse().unwrap(),
        session_type: "practice".to_string(),
        status: SessionStatus::Scheduled,
    };

    Mock::given(method("POST"))
        .and(path("/rest/v1/training_sessions"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!([{
            "athlete_id": ATHLETE,
            "scheduled_date": "2024-01-01",
            "start_time": "18:00",
            "end_time": "19:30",
            "session_type": "practice",
            "status": "scheduled"
        }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([session_row(11, "2024-01-01")])))
        .expect(1)
        .mount(&server)
        .await;

    let inserted = repository(&server).insert_sessions(&[new]).await.unwrap();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].id, SessionId::new(11));
}

#[tokio::test]
async fn test_insert_sessions_row_count_mismatch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/training_sessions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(&server)
        .await;

    let new = NewTrainingSession {
        athlete_id: athlete_id(),
        scheduled_date: "2024-01-01".parse().unwrap(),
        start_time: "18:00".parse().unwrap(),
        end_time: "19:30".parse().unwrap(),
        session_type: "practice".to_string(),
        status: SessionStatus::Scheduled,
    };
    let err = repository(&server).insert_sessions(&[new]).await.unwrap_err();
    assert!(matches!(err, RepositoryError::DecodeError { .. }));
}

#[tokio::test]
async fn test_empty_insert_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let inserted = repository(&server).insert_sessions(&[]).await.unwrap();
    assert!(inserted.is_empty());
}

#[tokio::test]
async fn test_update_session_patches_only_given_fields() {
    let server = MockServer::start().await;
    let mut completed = session_row(3, "2024-01-03");
    completed["status"] = json!("completed");

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/training_sessions"))
        .and(query_param("id", "eq.3"))
        .and(body_json(json!({ "status": "completed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([completed])))
        .expect(1)
        .mount(&server)
        .await;

    let update = SessionUpdate {
        status: Some(SessionStatus::Completed),
        notes: None,
    };
    let session = repository(&server)
        .update_session(SessionId::new(3), &update)
        .await
        .unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
}

#[tokio::test]
async fn test_status_errors_map_to_repository_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/progress_entries"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db exploded"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/training_schedules"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_string(r#"{"message":"duplicate key value violates unique constraint"}"#),
        )
        .mount(&server)
        .await;

    let repo = repository(&server);
    let err = repo.list_progress(athlete_id(), Some(5)).await.unwrap_err();
    assert!(matches!(err, RepositoryError::QueryError { .. }));
    assert_eq!(err.context().operation.as_deref(), Some("list_progress"));

    let rule = coachtrack::db::models::NewTrainingSchedule {
        athlete_id: athlete_id(),
        day_of_week: 1,
        start_time: "18:00".parse().unwrap(),
        end_time: "19:00".parse().unwrap(),
        session_type: "practice".to_string(),
    };
    let err = repo.create_schedule_rule(&rule).await.unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
}

#[tokio::test]
async fn test_unexpected_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/training_schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "not-a-number" }])))
        .mount(&server)
        .await;

    let err = repository(&server)
        .list_schedule_rules(athlete_id())
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::DecodeError { .. }));
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    assert!(!repository(&server).health_check().await.unwrap());

    let healthy = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&healthy)
        .await;
    assert!(repository(&healthy).health_check().await.unwrap());
}

#[tokio::test]
async fn test_unreachable_store_is_connection_error() {
    let repo = RemoteRepository::new(&BackendSettings::new("http://127.0.0.1:9", "key")).unwrap();
    let err = repo.get_profile(athlete_id()).await.unwrap_err();
    assert!(matches!(err, RepositoryError::ConnectionError { .. }));
    assert!(repo.health_check().await.is_err());
}

#[tokio::test]
async fn test_rpc_posts_arguments() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/count_sessions"))
        .and(body_json(json!({ "athlete": ATHLETE })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(12)))
        .expect(1)
        .mount(&server)
        .await;

    let repo = repository(&server);
    let count: i64 = repo
        .client()
        .rpc("count_sessions", &json!({ "athlete": ATHLETE }))
        .await
        .unwrap();
    assert_eq!(count, 12);
}
