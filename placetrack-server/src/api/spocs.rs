//! `/spocs` handlers

use crate::db::spocs;
use crate::error::ApiResult;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/createSPOC", axum::routing::post(create))
        // Route name predates this rewrite; the dashboard calls it as-is
        .route("/allSPCOS", get(all))
        .route("/:id", get(get_one).put(update).delete(delete_one))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<spocs::SpocFields>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let id = spocs::create(&state.db, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "SPOC created successfully", "id": id })),
    ))
}

async fn all(State(state): State<AppState>) -> ApiResult<Json<Vec<spocs::Spoc>>> {
    Ok(Json(spocs::list_all(&state.db).await?))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<spocs::Spoc>> {
    Ok(Json(spocs::get(&state.db, id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<spocs::SpocFields>,
) -> ApiResult<Json<Value>> {
    spocs::update(&state.db, id, &body).await?;
    Ok(Json(json!({ "message": "SPOC updated successfully" })))
}

async fn delete_one(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    spocs::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "SPOC deleted successfully" })))
}
