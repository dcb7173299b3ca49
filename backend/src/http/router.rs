//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Plans
        .route("/plans", get(handlers::list_plans))
        .route("/plans/generate", post(handlers::generate_plan))
        .route("/plans/skeleton", post(handlers::preview_skeleton))
        .route("/plans/active", get(handlers::get_active_plan))
        .route("/plans/{plan_id}", get(handlers::get_plan))
        // Profile
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::put_profile),
        )
        // Records
        .route(
            "/study-records",
            get(handlers::list_study_records).post(handlers::create_study_record),
        )
        .route(
            "/study-records/{record_id}",
            delete(handlers::delete_study_record),
        )
        .route(
            "/reading-records",
            get(handlers::list_reading_records).post(handlers::create_reading_record),
        )
        // Catalog
        .route("/books", get(handlers::list_books).post(handlers::create_book))
        .route(
            "/sources",
            get(handlers::list_sources).post(handlers::create_source),
        )
        .route("/topics", get(handlers::list_topics))
        // Roster
        .route("/invites", post(handlers::create_invite))
        .route("/invites/{code}/accept", post(handlers::accept_invite))
        .route("/students", get(handlers::list_students))
        // Charts
        .route("/stats/weekly", get(handlers::weekly_stats));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        // Profiles are small; 1 MiB leaves room for long custom block lists.
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
