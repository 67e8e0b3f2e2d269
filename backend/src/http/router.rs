//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Request bodies are small JSON documents.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Auth
        .route("/auth/signup", post(handlers::sign_up))
        .route("/auth/signin", post(handlers::sign_in))
        .route("/auth/signout", post(handlers::sign_out))
        .route("/auth/session", get(handlers::current_session))
        .route("/timezone", get(handlers::detect_timezone))
        // Profiles
        .route("/users/code/{code}", get(handlers::find_user_by_code))
        .route("/athletes/link", post(handlers::link_to_coach))
        // Schedule rules
        .route(
            "/athletes/{athlete_id}/schedules",
            get(handlers::list_schedule_rules).post(handlers::create_schedule_rule),
        )
        .route("/schedules/{rule_id}", delete(handlers::delete_schedule_rule))
        // Sessions
        .route(
            "/athletes/{athlete_id}/sessions/generate",
            post(handlers::generate_sessions),
        )
        .route("/athletes/{athlete_id}/sessions", get(handlers::list_sessions))
        .route("/sessions/preview", post(handlers::preview_sessions))
        .route("/sessions/{session_id}", patch(handlers::update_session))
        // Progress
        .route(
            "/athletes/{athlete_id}/progress",
            get(handlers::list_progress).post(handlers::record_progress),
        )
        // Dashboards
        .route("/dashboard/coach", get(handlers::coach_dashboard))
        .route("/dashboard/athlete", get(handlers::athlete_dashboard));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
