//! HTTP route handlers
//!
//! One module per resource root. Handlers parse parameters, call the
//! repositories, and shape the response; no SQL lives here.

pub mod batches;
pub mod lookups;
pub mod opportunities;
pub mod owner;
pub mod scores;
pub mod sme;
pub mod spocs;
pub mod students;
pub mod team_leaders;
pub mod users;

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "placetrack-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /
pub async fn root() -> &'static str {
    "Hello World!"
}
