//! placetrack-server library: HTTP service for the placement back office
//!
//! Exposes `AppState` and `build_router` so integration tests can drive
//! the full router in-process against an in-memory database.

use axum::routing::get;
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// bcrypt cost factor for user creation
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(db: SqlitePool, bcrypt_cost: u32) -> Self {
        Self { db, bcrypt_cost }
    }
}

/// Build the application router with one nest per resource root.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .nest("/batches", api::batches::router())
        .nest("/students", api::students::router())
        .nest("/opportunities", api::opportunities::router())
        .nest("/scores", api::scores::router())
        .nest("/teamLeader", api::team_leaders::router())
        .nest("/owner", api::owner::router())
        .nest("/sme", api::sme::router())
        .nest("/spocs", api::spocs::router())
        .nest("/users", api::users::router())
        .nest("/user", api::lookups::user_types_router())
        .nest("/domain", api::lookups::domains_router())
        .nest("/epic", api::lookups::epic_router())
        .nest("/eligibilityStatus", api::lookups::eligibility_status_router())
        .nest("/batch_status", api::lookups::batch_status_router())
        .nest("/placement", api::lookups::placements_router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
