//! Lookup-table handlers: `/user`, `/domain`, `/epic`, `/eligibilityStatus`,
//! `/batch_status`, `/placement`
//!
//! The key+label tables share one handler set parameterized by table; the
//! label-only tables each keep their historical response quirks.

use crate::db::lookups::{
    self, KeyLabelFields, KeyLabelTable, LabelFields, BATCH_STATUS, DOMAINS, ELIGIBILITY_STATUS,
    EPIC, PLACEMENTS, USER_TYPES,
};
use crate::error::ApiResult;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use placetrack_common::Error;
use serde_json::{json, Value};

fn key_label_router(
    table: KeyLabelTable,
    create_route: &'static str,
    list_route: &'static str,
    created_message: &'static str,
    updated_message: &'static str,
) -> Router<AppState> {
    Router::new()
        .route(
            create_route,
            post(move |State(state): State<AppState>, Json(body): Json<KeyLabelFields>| async move {
                let id = table.create(&state.db, &body).await?;
                ApiResult::Ok((
                    StatusCode::CREATED,
                    Json(json!({ "message": created_message, "id": id })),
                ))
            }),
        )
        .route(
            list_route,
            get(move |State(state): State<AppState>| async move {
                ApiResult::Ok(Json(table.list_all(&state.db).await?))
            }),
        )
        .route(
            "/:id",
            get(move |State(state): State<AppState>, Path(id): Path<i64>| async move {
                ApiResult::Ok(Json(table.get(&state.db, id).await?))
            })
            .put(
                move |State(state): State<AppState>,
                      Path(id): Path<i64>,
                      Json(body): Json<KeyLabelFields>| async move {
                    table.update(&state.db, id, &body).await?;
                    ApiResult::Ok(Json(json!({ "message": updated_message })))
                },
            ),
        )
}

pub fn user_types_router() -> Router<AppState> {
    key_label_router(
        USER_TYPES,
        "/createUser",
        "/allUsers",
        "User Type created successfully",
        "User Type updated successfully",
    )
}

pub fn domains_router() -> Router<AppState> {
    key_label_router(
        DOMAINS,
        "/createDomain",
        "/allDomains",
        "Domain created successfully",
        "Domain updated successfully",
    )
}

pub fn epic_router() -> Router<AppState> {
    key_label_router(
        EPIC,
        "/createEPIC",
        "/allEPIC",
        "EPIC created successfully",
        "EPIC updated successfully",
    )
}

// ---------------------------------------------------------------------------
// /eligibilityStatus: update and delete never report a missing row
// ---------------------------------------------------------------------------

pub fn eligibility_status_router() -> Router<AppState> {
    Router::new()
        .route("/all", get(eligibility_all))
        .route("/create", post(eligibility_create))
        .route(
            "/:id",
            get(eligibility_get)
                .put(eligibility_update)
                .delete(eligibility_delete),
        )
}

async fn eligibility_all(State(state): State<AppState>) -> ApiResult<Json<Vec<lookups::LabelRow>>> {
    Ok(Json(ELIGIBILITY_STATUS.list_by_id(&state.db).await?))
}

async fn eligibility_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<lookups::LabelRow>> {
    Ok(Json(ELIGIBILITY_STATUS.get(&state.db, id).await?))
}

async fn eligibility_create(
    State(state): State<AppState>,
    Json(body): Json<LabelFields>,
) -> ApiResult<Json<Value>> {
    let label = lookups::require_label(&body)?;
    let id = ELIGIBILITY_STATUS.insert(&state.db, label).await?;
    Ok(Json(json!({ "id": id, "label": label })))
}

async fn eligibility_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<LabelFields>,
) -> ApiResult<Json<Value>> {
    let label = lookups::require_label(&body)?;
    ELIGIBILITY_STATUS.update(&state.db, id, label).await?;
    Ok(Json(json!({ "id": id, "label": label })))
}

async fn eligibility_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    ELIGIBILITY_STATUS.delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Deleted successfully" })))
}

// ---------------------------------------------------------------------------
// /batch_status: create and update echo the stored row back
// ---------------------------------------------------------------------------

pub fn batch_status_router() -> Router<AppState> {
    Router::new()
        .route("/all", get(batch_status_all))
        .route("/create", post(batch_status_create))
        .route("/:id", put(batch_status_update).delete(batch_status_delete))
}

async fn batch_status_all(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<lookups::LabelRow>>> {
    Ok(Json(BATCH_STATUS.list_by_id(&state.db).await?))
}

async fn batch_status_create(
    State(state): State<AppState>,
    Json(body): Json<LabelFields>,
) -> ApiResult<Json<lookups::LabelRow>> {
    let label = lookups::require_label(&body)?;
    let id = BATCH_STATUS.insert(&state.db, label).await?;
    Ok(Json(BATCH_STATUS.get(&state.db, id).await?))
}

async fn batch_status_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<LabelFields>,
) -> ApiResult<Json<lookups::LabelRow>> {
    let label = lookups::require_label(&body)?;
    BATCH_STATUS.update(&state.db, id, label).await?;
    Ok(Json(BATCH_STATUS.get(&state.db, id).await?))
}

async fn batch_status_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    BATCH_STATUS.delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Batch status deleted successfully" })))
}

// ---------------------------------------------------------------------------
// /placement: labels are trimmed before storage
// ---------------------------------------------------------------------------

pub fn placements_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(placement_create))
        .route("/placements", get(placement_all))
        .route(
            "/:id",
            get(placement_get)
                .put(placement_update)
                .delete(placement_delete),
        )
}

async fn placement_create(
    State(state): State<AppState>,
    Json(body): Json<LabelFields>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let label = lookups::require_label_trimmed(&body)?;
    let id = PLACEMENTS.insert(&state.db, label).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Placement created successfully",
            "placementId": id,
        })),
    ))
}

async fn placement_all(State(state): State<AppState>) -> ApiResult<Json<Vec<lookups::LabelRow>>> {
    Ok(Json(PLACEMENTS.list_newest_first(&state.db).await?))
}

async fn placement_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<lookups::LabelRow>> {
    Ok(Json(PLACEMENTS.get(&state.db, id).await?))
}

async fn placement_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<LabelFields>,
) -> ApiResult<Json<Value>> {
    let label = lookups::require_label_trimmed(&body)?;
    if PLACEMENTS.update(&state.db, id, label).await? == 0 {
        return Err(Error::NotFound("Placement not found".to_string()).into());
    }
    Ok(Json(json!({ "message": "Placement updated successfully" })))
}

async fn placement_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    if PLACEMENTS.delete(&state.db, id).await? == 0 {
        return Err(Error::NotFound("Placement not found".to_string()).into());
    }
    Ok(Json(json!({ "message": "Placement deleted successfully" })))
}
