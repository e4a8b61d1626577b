//! `/users` handlers (dashboard login accounts)

use crate::db::users;
use crate::error::ApiResult;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all", get(all))
        .route("/create", axum::routing::post(create))
        .route("/:id", axum::routing::put(update).delete(delete_one))
}

async fn all(State(state): State<AppState>) -> ApiResult<Json<Vec<users::User>>> {
    Ok(Json(users::list_all(&state.db).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<users::UserFields>,
) -> ApiResult<(StatusCode, Json<users::User>)> {
    let user = users::create(&state.db, &body, state.bcrypt_cost).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<users::UserFields>,
) -> ApiResult<Json<users::User>> {
    Ok(Json(users::update(&state.db, id, &body).await?))
}

async fn delete_one(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    users::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
