//! `/scores` handlers

use crate::db::scores;
use crate::error::ApiResult;
use crate::AppState;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/allScores", get(all))
        .route("/:booking_id", axum::routing::post(save).put(update))
}

async fn all(State(state): State<AppState>) -> ApiResult<Json<Vec<scores::Score>>> {
    Ok(Json(scores::list_all(&state.db).await?))
}

async fn save(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    Json(body): Json<scores::ScoreFields>,
) -> ApiResult<Json<Value>> {
    scores::upsert(&state.db, &booking_id, &body).await?;
    Ok(Json(json!({
        "message": format!("Score saved successfully for {}", booking_id),
    })))
}

async fn update(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    Json(body): Json<scores::ScoreFields>,
) -> ApiResult<Json<Value>> {
    let affected = scores::update(&state.db, &booking_id, &body).await?;
    Ok(Json(json!({
        "message": format!("Scores updated successfully for {}", booking_id),
        "affectedRows": affected,
    })))
}
