//! `/sme` handlers
//!
//! The SME dashboard surface. Unlike the rest of the API, every response
//! here is wrapped in a `{success, ...}` envelope.

use crate::db::{stats, students, trainers};
use crate::error::SmeResult;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use placetrack_common::{domain, Error};
use serde::Deserialize;
use serde_json::{json, Value};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", get(all_students).post(create_student))
        .route("/students/search", get(search_students))
        .route("/students/epic-stats", get(epic_stats))
        .route("/students/batch/:batch_no", get(students_by_batch))
        .route(
            "/students/:booking_id",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/trainers", get(active_trainers))
        .route(
            "/batches/:batch_no/trainer-assignments",
            get(trainer_assignments).post(add_trainer_assignment),
        )
        .route("/dashboard", get(dashboard))
        .route("/domains", get(domains))
}

fn listing(rows: Vec<students::Student>) -> Json<Value> {
    let count = rows.len();
    Json(json!({ "success": true, "data": rows, "count": count }))
}

async fn all_students(State(state): State<AppState>) -> SmeResult<Json<Value>> {
    Ok(listing(students::list_all(&state.db).await?))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    query: Option<String>,
}

async fn search_students(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> SmeResult<Json<Value>> {
    Ok(listing(
        students::search_by_batch_no(&state.db, q.query.as_deref()).await?,
    ))
}

async fn epic_stats(State(state): State<AppState>) -> SmeResult<Json<Value>> {
    let data = stats::epic_stats(&state.db).await?;
    Ok(Json(json!({ "success": true, "data": data })))
}

async fn students_by_batch(
    State(state): State<AppState>,
    Path(batch_no): Path<String>,
) -> SmeResult<Json<Value>> {
    Ok(listing(students::by_batch_no(&state.db, &batch_no).await?))
}

async fn get_student(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> SmeResult<Json<Value>> {
    let student = students::get_by_booking_id(&state.db, &booking_id).await?;
    Ok(Json(json!({ "success": true, "data": student })))
}

async fn create_student(
    State(state): State<AppState>,
    Json(body): Json<students::NewStudent>,
) -> SmeResult<(StatusCode, Json<Value>)> {
    let id = students::create(&state.db, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "studentId": id,
            "message": "Student created successfully",
        })),
    ))
}

async fn update_student(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    Json(body): Json<students::StudentUpdate>,
) -> SmeResult<Json<Value>> {
    students::update(&state.db, &booking_id, &body).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Student updated successfully",
    })))
}

async fn delete_student(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> SmeResult<Json<Value>> {
    students::delete(&state.db, &booking_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Student deleted successfully",
    })))
}

async fn active_trainers(State(state): State<AppState>) -> SmeResult<Json<Value>> {
    let data = trainers::active_trainers(&state.db).await?;
    Ok(Json(json!({ "success": true, "data": data })))
}

/// Current trainer/timing assignment arrays for a batch, with times
/// rendered back in 12-hour display form.
async fn trainer_assignments(
    State(state): State<AppState>,
    Path(batch_no): Path<String>,
) -> SmeResult<Json<Value>> {
    if batch_no.is_empty() {
        return Err(Error::Validation("Valid batch_no is required".to_string()).into());
    }

    let rows = trainers::assignments_for_batch(&state.db, &batch_no).await?;
    let trainer: Vec<&str> = rows.iter().map(|r| r.trainer_name.as_str()).collect();
    let s_timing: Vec<String> = rows
        .iter()
        .map(|r| trainers::format_time_12h(&r.start_time))
        .collect();
    let e_timing: Vec<String> = rows
        .iter()
        .map(|r| trainers::format_time_12h(&r.end_time))
        .collect();

    Ok(Json(json!({
        "success": true,
        "data": { "trainer": trainer, "s_timing": s_timing, "e_timing": e_timing },
    })))
}

async fn add_trainer_assignment(
    State(state): State<AppState>,
    Path(batch_no): Path<String>,
    Json(body): Json<trainers::AssignmentRequest>,
) -> SmeResult<(StatusCode, Json<Value>)> {
    if batch_no.is_empty() {
        return Err(Error::Validation("Valid batch_no is required".to_string()).into());
    }

    trainers::add_assignment(&state.db, &batch_no, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Trainer assignment added successfully",
        })),
    ))
}

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    domain: Option<String>,
}

async fn dashboard(
    State(state): State<AppState>,
    Query(q): Query<DashboardQuery>,
) -> SmeResult<Json<Value>> {
    let Some(domain_key) = q.domain.as_deref() else {
        return Err(Error::Validation("Domain query parameter is required".to_string()).into());
    };
    if !domain::SME_DASHBOARD_KEYS.contains(&domain_key)
        || domain::dashboard_label(domain_key).is_none()
    {
        return Err(Error::Validation("Invalid domain".to_string()).into());
    }

    let data = stats::sme_dashboard(&state.db, domain_key).await?;
    Ok(Json(json!({ "success": true, "data": data })))
}

async fn domains(State(state): State<AppState>) -> SmeResult<Json<Value>> {
    let data = stats::sme_domains(&state.db).await?;
    Ok(Json(json!({ "success": true, "data": data })))
}
