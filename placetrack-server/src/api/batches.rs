//! `/batches` handlers

use crate::db::{batches, stats, students};
use crate::error::ApiResult;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/allBatches", get(all_batches))
        .route("/addBatch", axum::routing::post(add_batch))
        .route("/totalBatches", get(total_batches))
        .route("/search", get(search))
        .route("/batchNo/:batch_name", get(by_batch_name))
        .route(
            "/:id",
            get(get_batch)
                .put(update_batch)
                .delete(delete_batch)
                // The path segment is a booking id here: transfer a student
                .post(transfer_student),
        )
}

async fn all_batches(State(state): State<AppState>) -> ApiResult<Json<Vec<batches::Batch>>> {
    Ok(Json(batches::list_all(&state.db).await?))
}

async fn add_batch(
    State(state): State<AppState>,
    Json(body): Json<batches::NewBatch>,
) -> ApiResult<Json<Value>> {
    let id = batches::create(&state.db, &body).await?;
    Ok(Json(
        json!({ "message": "Batch added successfully", "batchId": id }),
    ))
}

async fn total_batches(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let counts = stats::batches_per_domain(&state.db).await?;
    Ok(Json(json!({ "totalBatchesPerDomain": counts })))
}

async fn search(
    State(state): State<AppState>,
    Query(filter): Query<batches::BatchSearch>,
) -> ApiResult<Json<Vec<batches::Batch>>> {
    Ok(Json(batches::search(&state.db, &filter).await?))
}

async fn by_batch_name(
    State(state): State<AppState>,
    Path(batch_name): Path<String>,
) -> ApiResult<Json<batches::Batch>> {
    Ok(Json(batches::get_by_name(&state.db, &batch_name).await?))
}

/// Batch detail plus its students, matched on the batch number.
async fn get_batch(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    let batch = batches::get(&state.db, id).await?;
    let batch_students = students::by_batch_no(&state.db, &batch.batch_no).await?;
    Ok(Json(json!({ "batch": batch, "students": batch_students })))
}

async fn update_batch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<batches::BatchUpdate>,
) -> ApiResult<Json<Value>> {
    batches::update(&state.db, id, &body).await?;
    Ok(Json(json!({ "message": "Batch updated successfully" })))
}

async fn delete_batch(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    batches::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Batch deleted successfully" })))
}

async fn transfer_student(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    Json(body): Json<batches::TransferRequest>,
) -> ApiResult<Json<Value>> {
    batches::transfer_student(&state.db, &booking_id, &body).await?;
    Ok(Json(json!({ "message": "Batch changed successfully" })))
}
