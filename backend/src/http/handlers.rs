//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer. Routes under an athlete id check the coach/athlete access rule
//! before touching the store.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use super::dto::{
    AthleteDashboard, AuthSession, AuthUser, CoachDashboard, DashboardQuery,
    GenerateSessionsRequest, GenerationReport, HealthResponse, LinkCoachRequest,
    PreviewSessionsRequest, PreviewSessionsResponse, ProfileSummary, ProgressEntry,
    ProgressInput, ProgressListResponse, ProgressQuery, RegisteredAccount, Registration,
    ScheduleRule, ScheduleRuleListResponse, SessionListResponse, SessionsQuery, SignInRequest,
    SignOutResponse, TimezoneDetection, TrainingSchedule, TrainingSession, UpdateSessionRequest,
};
use super::error::AppError;
use super::extract::{bearer_token, ClientIp, CurrentUser};
use super::state::AppState;
use crate::db::models::{Profile, ScheduleRuleId, SessionId, UserId};
use crate::db::repository::{ScheduleRepository, SessionRepository};
use crate::db::services as db_services;
use crate::models::DateRange;
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_user_id(raw: &str) -> Result<UserId, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("'{}' is not a valid user id", raw)))
}

fn today(query: &DashboardQuery) -> chrono::NaiveDate {
    query
        .today
        .unwrap_or_else(|| chrono::Utc::now().date_naive())
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Verify the service is running and the store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            "error".to_string()
        }
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Auth
// =============================================================================

/// POST /v1/auth/signup
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<Registration>,
) -> Result<(StatusCode, Json<RegisteredAccount>), AppError> {
    let account =
        services::register(state.repository.as_ref(), state.auth.as_ref(), &request).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// POST /v1/auth/signin
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> HandlerResult<AuthSession> {
    let session = state.auth.sign_in(&request.email, &request.password).await?;
    Ok(Json(session))
}

/// POST /v1/auth/signout
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<SignOutResponse> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;
    state.auth.sign_out(token).await?;
    Ok(Json(SignOutResponse { signed_out: true }))
}

/// GET /v1/auth/session
///
/// The current user, or `null` without a valid token.
pub async fn current_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<Option<AuthUser>> {
    let user = match bearer_token(&headers) {
        Some(token) => state.auth.current_session(token).await?,
        None => None,
    };
    Ok(Json(user))
}

// =============================================================================
// Timezone
// =============================================================================

/// GET /v1/timezone
pub async fn detect_timezone(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
) -> HandlerResult<TimezoneDetection> {
    Ok(Json(state.timezone.detect(ip).await))
}

// =============================================================================
// Profiles and linking
// =============================================================================

/// GET /v1/users/code/{code}
pub async fn find_user_by_code(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(code): Path<String>,
) -> HandlerResult<ProfileSummary> {
    let profile = services::find_by_code(state.repository.as_ref(), &code).await?;
    Ok(Json(profile.into()))
}

/// POST /v1/athletes/link
pub async fn link_to_coach(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<LinkCoachRequest>,
) -> HandlerResult<Profile> {
    let profile = services::link_athlete_to_coach(
        state.repository.as_ref(),
        current.user.id,
        &request.coach_code,
    )
    .await?;
    Ok(Json(profile))
}

// =============================================================================
// Schedule rules
// =============================================================================

/// GET /v1/athletes/{athlete_id}/schedules
pub async fn list_schedule_rules(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(athlete_id): Path<String>,
) -> HandlerResult<ScheduleRuleListResponse> {
    let athlete_id = parse_user_id(&athlete_id)?;
    let repo = state.repository.as_ref();
    services::ensure_athlete_access(repo, current.user.id, athlete_id).await?;

    let rules = db_services::list_schedule_rules(repo, athlete_id).await?;
    let total = rules.len();
    Ok(Json(ScheduleRuleListResponse { rules, total }))
}

/// POST /v1/athletes/{athlete_id}/schedules
pub async fn create_schedule_rule(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(athlete_id): Path<String>,
    Json(rule): Json<ScheduleRule>,
) -> Result<(StatusCode, Json<TrainingSchedule>), AppError> {
    let athlete_id = parse_user_id(&athlete_id)?;
    let repo = state.repository.as_ref();
    services::ensure_athlete_access(repo, current.user.id, athlete_id).await?;

    let stored = db_services::create_schedule_rule(repo, athlete_id, rule).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// DELETE /v1/schedules/{rule_id}
pub async fn delete_schedule_rule(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(rule_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let rule_id = ScheduleRuleId::new(rule_id);
    let repo = state.repository.as_ref();
    let rule = repo.get_schedule_rule(rule_id).await?;
    services::ensure_athlete_access(repo, current.user.id, rule.athlete_id).await?;

    db_services::delete_schedule_rule(repo, rule_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Sessions
// =============================================================================

/// POST /v1/athletes/{athlete_id}/sessions/generate
pub async fn generate_sessions(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(athlete_id): Path<String>,
    Json(request): Json<GenerateSessionsRequest>,
) -> HandlerResult<GenerationReport> {
    let athlete_id = parse_user_id(&athlete_id)?;
    let range = DateRange::parse(&request.start_date, &request.end_date)?;
    let repo = state.repository.as_ref();
    services::ensure_athlete_access(repo, current.user.id, athlete_id).await?;

    let report = services::generate_sessions(repo, athlete_id, range, request.policy).await?;
    Ok(Json(report))
}

/// GET /v1/athletes/{athlete_id}/sessions?from=YYYY-MM-DD&to=YYYY-MM-DD
pub async fn list_sessions(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(athlete_id): Path<String>,
    Query(query): Query<SessionsQuery>,
) -> HandlerResult<SessionListResponse> {
    let athlete_id = parse_user_id(&athlete_id)?;
    let range = match (query.from.as_deref(), query.to.as_deref()) {
        (Some(from), Some(to)) => Some(DateRange::parse(from, to)?),
        (None, None) => None,
        _ => {
            return Err(AppError::BadRequest(
                "'from' and 'to' must be given together".to_string(),
            ))
        }
    };
    let repo = state.repository.as_ref();
    services::ensure_athlete_access(repo, current.user.id, athlete_id).await?;

    let sessions = db_services::list_sessions(repo, athlete_id, range).await?;
    let total = sessions.len();
    Ok(Json(SessionListResponse { sessions, total }))
}

/// PATCH /v1/sessions/{session_id}
pub async fn update_session(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(session_id): Path<i64>,
    Json(request): Json<UpdateSessionRequest>,
) -> HandlerResult<TrainingSession> {
    let session_id = SessionId::new(session_id);
    let repo = state.repository.as_ref();
    let session = repo.get_session(session_id).await?;
    services::ensure_athlete_access(repo, current.user.id, session.athlete_id).await?;

    let updated =
        services::update_session_status(repo, session_id, request.status, request.notes).await?;
    Ok(Json(updated))
}

/// POST /v1/sessions/preview
///
/// Pure materialization; nothing is stored.
pub async fn preview_sessions(
    Json(request): Json<PreviewSessionsRequest>,
) -> HandlerResult<PreviewSessionsResponse> {
    let range = DateRange::parse(&request.start_date, &request.end_date)?;
    let sessions = services::preview_sessions(&request.rules, &range, request.policy)?;
    let total = sessions.len();
    Ok(Json(PreviewSessionsResponse { sessions, total }))
}

// =============================================================================
// Progress
// =============================================================================

/// GET /v1/athletes/{athlete_id}/progress
pub async fn list_progress(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(athlete_id): Path<String>,
    Query(query): Query<ProgressQuery>,
) -> HandlerResult<ProgressListResponse> {
    let athlete_id = parse_user_id(&athlete_id)?;
    let repo = state.repository.as_ref();
    services::ensure_athlete_access(repo, current.user.id, athlete_id).await?;

    let entries = services::list_progress(repo, athlete_id, query.limit).await?;
    let total = entries.len();
    Ok(Json(ProgressListResponse { entries, total }))
}

/// POST /v1/athletes/{athlete_id}/progress
pub async fn record_progress(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(athlete_id): Path<String>,
    Json(input): Json<ProgressInput>,
) -> Result<(StatusCode, Json<ProgressEntry>), AppError> {
    let athlete_id = parse_user_id(&athlete_id)?;
    let repo = state.repository.as_ref();
    services::ensure_athlete_access(repo, current.user.id, athlete_id).await?;

    let entry = services::record_progress(repo, athlete_id, input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

// =============================================================================
// Dashboards
// =============================================================================

/// GET /v1/dashboard/coach
pub async fn coach_dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<DashboardQuery>,
) -> HandlerResult<CoachDashboard> {
    let dashboard =
        services::coach_dashboard(state.repository.as_ref(), current.user.id, today(&query))
            .await?;
    Ok(Json(dashboard))
}

/// GET /v1/dashboard/athlete
pub async fn athlete_dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<DashboardQuery>,
) -> HandlerResult<AthleteDashboard> {
    let dashboard =
        services::athlete_dashboard(state.repository.as_ref(), current.user.id, today(&query))
            .await?;
    Ok(Json(dashboard))
}
