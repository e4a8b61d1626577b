//! `/opportunities` handlers

use crate::db::{opportunities, students};
use crate::error::ApiResult;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/addOpportunity", post(add))
        .route("/allOpportunities", get(all))
        .route("/assignStudents", post(assign).put(reassign))
        .route(
            "/opportunity/:id",
            get(get_one).put(update).delete(delete_one),
        )
        .route("/opportunity/:id/students", get(students_for))
}

async fn add(
    State(state): State<AppState>,
    Json(body): Json<opportunities::OpportunityFields>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let id = opportunities::create(&state.db, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Opportunity created", "id": id })),
    ))
}

async fn all(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<opportunities::Opportunity>>> {
    Ok(Json(opportunities::list_all(&state.db).await?))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<opportunities::Opportunity>> {
    Ok(Json(opportunities::get(&state.db, id).await?))
}

async fn students_for(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<students::Student>>> {
    Ok(Json(opportunities::students_for(&state.db, id).await?))
}

#[derive(Debug, Deserialize)]
struct AssignBody {
    opportunity_id: i64,
    #[serde(default)]
    student_ids: Option<Vec<String>>,
}

async fn assign(
    State(state): State<AppState>,
    Json(body): Json<AssignBody>,
) -> ApiResult<Json<Value>> {
    let ids = body.student_ids.unwrap_or_default();
    let inserted = opportunities::assign_students(&state.db, body.opportunity_id, &ids).await?;
    Ok(Json(json!({
        "message": "Students assigned to opportunity successfully",
        "insertedRows": inserted,
    })))
}

async fn reassign(
    State(state): State<AppState>,
    Json(body): Json<AssignBody>,
) -> ApiResult<Json<Value>> {
    let ids = body.student_ids.unwrap_or_default();
    let inserted = opportunities::reassign_students(&state.db, body.opportunity_id, &ids).await?;
    Ok(Json(json!({
        "message": "Students reassigned to opportunity successfully",
        "insertedRows": inserted,
    })))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<opportunities::OpportunityFields>,
) -> ApiResult<Json<Value>> {
    opportunities::update(&state.db, id, &body).await?;
    Ok(Json(json!({ "message": "Opportunity updated successfully" })))
}

async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    opportunities::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Opportunity deleted successfully" })))
}
