//! `/owner` handlers: placement-ops head dashboard and reports

use crate::db::{reports, stats};
use crate::error::ApiResult;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/counts", get(dashboard_counts))
        .route("/dashboard/graphs", get(dashboard_graphs))
        .route("/reports/batches", get(report_batches))
        .route("/reports/placements", get(report_placements))
        .route("/reports/student/:booking_id", get(report_student))
        .route("/reports/domains", get(report_domains))
        .route("/reports/batches-by-domain", get(batches_by_domain))
        .route("/epic/search", get(epic_search))
        .route("/placement/yet-to-place", get(yet_to_place))
}

async fn dashboard_counts(State(state): State<AppState>) -> ApiResult<Json<stats::OwnerCounts>> {
    Ok(Json(stats::owner_counts(&state.db).await?))
}

async fn dashboard_graphs(State(state): State<AppState>) -> ApiResult<Json<stats::OwnerGraphs>> {
    Ok(Json(stats::owner_graphs(&state.db).await?))
}

#[derive(Debug, Deserialize)]
struct ReportQuery {
    domain: Option<String>,
    batch: Option<String>,
}

async fn report_batches(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> ApiResult<Json<Vec<reports::StudentReportRow>>> {
    Ok(Json(
        reports::students_report(&state.db, q.domain.as_deref(), q.batch.as_deref()).await?,
    ))
}

async fn report_placements(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> ApiResult<Json<Vec<reports::PlacementReportRow>>> {
    Ok(Json(
        reports::placements_report(&state.db, q.domain.as_deref(), q.batch.as_deref()).await?,
    ))
}

async fn report_student(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> ApiResult<Json<reports::StudentDetail>> {
    Ok(Json(reports::student_detail(&state.db, &booking_id).await?))
}

async fn report_domains() -> Json<Vec<reports::DomainOption>> {
    Json(reports::domain_options())
}

#[derive(Debug, Deserialize)]
struct DomainQuery {
    domain: Option<String>,
}

async fn batches_by_domain(
    State(state): State<AppState>,
    Query(q): Query<DomainQuery>,
) -> ApiResult<Json<Vec<reports::BatchSummary>>> {
    let domain = q.domain.as_deref().ok_or_else(|| {
        placetrack_common::Error::Validation("Domain is required".to_string())
    })?;
    Ok(Json(reports::batches_by_domain(&state.db, domain).await?))
}

async fn epic_search(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> ApiResult<Json<Vec<reports::EpicReportRow>>> {
    Ok(Json(
        reports::epic_report(&state.db, q.domain.as_deref(), q.batch.as_deref()).await?,
    ))
}

async fn yet_to_place(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> ApiResult<Json<Vec<reports::EpicReportRow>>> {
    Ok(Json(
        reports::yet_to_place_report(&state.db, q.domain.as_deref(), q.batch.as_deref()).await?,
    ))
}
