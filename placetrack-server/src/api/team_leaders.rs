//! `/teamLeader` handlers

use crate::db::team_leaders;
use crate::error::ApiResult;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(all).post(create))
        .route("/:id", get(get_one).put(update).delete(delete_one))
}

fn with_message(record: &team_leaders::TeamLeader, message: &str) -> Value {
    let mut body = serde_json::to_value(record).unwrap_or_else(|_| json!({}));
    if let Some(map) = body.as_object_mut() {
        map.insert("message".to_string(), json!(message));
    }
    body
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<team_leaders::TeamLeaderFields>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let tl = team_leaders::create(&state.db, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(with_message(&tl, "Team Leader created successfully")),
    ))
}

async fn all(State(state): State<AppState>) -> ApiResult<Json<Vec<team_leaders::TeamLeader>>> {
    Ok(Json(team_leaders::list_all(&state.db).await?))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<team_leaders::TeamLeader>> {
    Ok(Json(team_leaders::get(&state.db, &id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<team_leaders::TeamLeaderFields>,
) -> ApiResult<Json<Value>> {
    let tl = team_leaders::update(&state.db, &id, &body).await?;
    Ok(Json(with_message(&tl, "Team Leader updated successfully")))
}

async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let name = team_leaders::delete(&state.db, &id).await?;
    Ok(Json(json!({
        "message": format!("Team Leader {} deleted successfully", name),
        "deletedId": id,
    })))
}
