//! `/students` handlers

use crate::db::{stats, students};
use crate::error::ApiResult;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Datelike;
use placetrack_common::Error;
use serde::Deserialize;
use serde_json::{json, Value};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(filter_root))
        .route("/allStudents", get(all_students))
        .route("/bulkAdd/:batch_name", post(bulk_add))
        .route("/filter", get(filter))
        .route("/placed", get(placed))
        .route("/stats", get(dashboard_stats))
        .route("/graphs", get(graphs))
        .route("/graph-data", get(graph_data))
        .route("/dashboard/stats", get(combined_stats))
        .route("/student/:booking_id", get(by_booking_id))
        .route("/placement/:booking_id", put(update_placement))
        .route("/:batch_name", get(by_batch))
        .route("/:batch_name/:epic_status", get(by_batch_and_epic))
}

async fn all_students(State(state): State<AppState>) -> ApiResult<Json<Vec<students::Student>>> {
    Ok(Json(students::list_all(&state.db).await?))
}

#[derive(Debug, Deserialize)]
struct BulkAddBody {
    students: Option<Vec<students::BulkStudent>>,
}

async fn bulk_add(
    State(state): State<AppState>,
    Path(batch_name): Path<String>,
    Json(body): Json<BulkAddBody>,
) -> ApiResult<Json<Value>> {
    if batch_name.is_empty() {
        return Err(Error::Validation("Batch name is required in params".to_string()).into());
    }
    let records = body
        .students
        .ok_or_else(|| Error::Validation("No student data provided".to_string()))?;

    let inserted = students::bulk_insert(&state.db, &batch_name, &records).await?;
    Ok(Json(json!({
        "message": "Students inserted successfully",
        "insertedCount": inserted,
    })))
}

#[derive(Debug, Deserialize)]
struct RootFilter {
    batch_id: Option<i64>,
    placement: Option<String>,
}

async fn filter_root(
    State(state): State<AppState>,
    Query(q): Query<RootFilter>,
) -> ApiResult<Json<Vec<students::Student>>> {
    if q.batch_id.is_none() && q.placement.is_none() {
        return Err(Error::Validation(
            "Please provide either batch_id or placement as query parameters".to_string(),
        )
        .into());
    }
    Ok(Json(
        students::filter_by_batch_id(&state.db, q.batch_id, q.placement.as_deref()).await?,
    ))
}

#[derive(Debug, Deserialize)]
struct FilterQuery {
    batch_name: Option<String>,
    status: Option<String>,
    placement: Option<String>,
}

async fn filter(
    State(state): State<AppState>,
    Query(q): Query<FilterQuery>,
) -> ApiResult<Json<Vec<students::Student>>> {
    if q.batch_name.is_none() && q.status.is_none() && q.placement.is_none() {
        return Err(
            Error::Validation("Please provide at least one filter parameter".to_string()).into(),
        );
    }
    Ok(Json(
        students::filter(
            &state.db,
            q.batch_name.as_deref(),
            q.status.as_deref(),
            q.placement.as_deref(),
        )
        .await?,
    ))
}

async fn by_booking_id(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> ApiResult<Json<students::Student>> {
    Ok(Json(
        students::get_by_booking_id(&state.db, &booking_id).await?,
    ))
}

async fn by_batch(
    State(state): State<AppState>,
    Path(batch_name): Path<String>,
) -> ApiResult<Json<Vec<students::Student>>> {
    let rows = students::by_batch_name(&state.db, &batch_name).await?;
    if rows.is_empty() {
        return Err(Error::NotFound("No students found for this batch".to_string()).into());
    }
    Ok(Json(rows))
}

async fn by_batch_and_epic(
    State(state): State<AppState>,
    Path((batch_name, epic_status)): Path<(String, String)>,
) -> ApiResult<Json<Vec<students::Student>>> {
    let rows = students::by_batch_name_and_epic(&state.db, &batch_name, &epic_status).await?;
    if rows.is_empty() {
        return Err(Error::NotFound(
            "No students found for this batch and epic status".to_string(),
        )
        .into());
    }
    Ok(Json(rows))
}

async fn placed(State(state): State<AppState>) -> ApiResult<Json<Vec<students::Student>>> {
    let rows = students::placed(&state.db).await?;
    if rows.is_empty() {
        return Err(Error::NotFound("No placed students found".to_string()).into());
    }
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
struct PlacementBody {
    status: Option<String>,
}

/// Restricted placement statuses: this route only parks a student as
/// exempt or ineligible; actual placements go through the SME update.
async fn update_placement(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    Json(body): Json<PlacementBody>,
) -> ApiResult<Json<Value>> {
    let status = body.status.as_deref().filter(|s| matches!(*s, "Not Required" | "Ineligible"));
    let Some(status) = status else {
        return Err(Error::Validation(
            "Invalid status. Use 'Not Required' or 'Ineligible'".to_string(),
        )
        .into());
    };

    students::update_placement(&state.db, &booking_id, status).await?;
    Ok(Json(json!({
        "message": format!("Student marked as {} successfully", status),
    })))
}

async fn dashboard_stats(State(state): State<AppState>) -> ApiResult<Json<stats::DashboardStats>> {
    Ok(Json(stats::student_stats(&state.db).await?))
}

async fn combined_stats(State(state): State<AppState>) -> ApiResult<Json<stats::DashboardStats>> {
    Ok(Json(stats::combined_dashboard_stats(&state.db).await?))
}

async fn graphs(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let year = chrono::Utc::now().year();
    let current = stats::placement_graph_with_packages(&state.db, year).await?;
    let previous = stats::placement_graph_with_packages(&state.db, year - 1).await?;
    Ok(Json(
        json!({ "previousData": previous, "currentData": current }),
    ))
}

async fn graph_data(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let year = chrono::Utc::now().year();
    let current = stats::placement_graph(&state.db, year).await?;
    let previous = stats::placement_graph(&state.db, year - 1).await?;
    Ok(Json(
        json!({ "previousData": previous, "currentData": current }),
    ))
}
