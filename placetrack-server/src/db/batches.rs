//! Batch repository
//!
//! CRUD over the `batches` table plus the batch-transfer operation, which
//! spans `batches`, `students`, and the `batch_changes` audit trail.

use placetrack_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Batch record as stored.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Batch {
    pub id: i64,
    pub batch_no: String,
    pub batch_name: Option<String>,
    pub status: Option<String>,
    pub mode: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub domain: Option<String>,
    pub sections: Option<String>,
    pub trainer_name: Option<String>,
    pub total_count: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub created_at: String,
}

/// Fields accepted when creating a batch.
#[derive(Debug, Deserialize)]
pub struct NewBatch {
    pub batch_no: String,
    pub batch_name: Option<String>,
    pub status: Option<String>,
    pub mode: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub domain: Option<String>,
    pub sections: Option<String>,
    pub trainer_name: Option<String>,
    pub total_count: Option<i64>,
}

/// Fields accepted when updating a batch. The update is a full-row write:
/// absent fields clear their columns, matching the dashboard's edit form.
#[derive(Debug, Deserialize)]
pub struct BatchUpdate {
    pub batch_name: Option<String>,
    pub status: Option<String>,
    pub mode: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub domain: Option<String>,
    pub trainer_name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Optional search filters; all present filters are ANDed together.
#[derive(Debug, Default, Deserialize)]
pub struct BatchSearch {
    pub batch_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub mode: Option<String>,
}

/// Batch-transfer request body.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub to_batch: String,
    pub domain: Option<String>,
    pub reason: Option<String>,
    pub attachment_url: Option<String>,
    pub requested_by: Option<String>,
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Batch>> {
    let rows = sqlx::query_as::<_, Batch>("SELECT * FROM batches")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, batch: &NewBatch) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO batches
            (batch_no, batch_name, status, mode, start_date, end_date, domain, sections, trainer_name, total_count)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&batch.batch_no)
    .bind(&batch.batch_name)
    .bind(&batch.status)
    .bind(&batch.mode)
    .bind(&batch.start_date)
    .bind(&batch.end_date)
    .bind(&batch.domain)
    .bind(&batch.sections)
    .bind(&batch.trainer_name)
    .bind(batch.total_count)
    .execute(pool)
    .await
    .map_err(|e| Error::from_sqlx(e, "Batch number already exists"))?;

    Ok(result.last_insert_rowid())
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Batch> {
    sqlx::query_as::<_, Batch>("SELECT * FROM batches WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound("Batch not found".to_string()))
}

/// Lookup by the human-entered batch name (the `/batchNo/` route has
/// always matched on `batch_name`, and the dashboard depends on that).
pub async fn get_by_name(pool: &SqlitePool, batch_name: &str) -> Result<Batch> {
    sqlx::query_as::<_, Batch>("SELECT * FROM batches WHERE batch_name = ?")
        .bind(batch_name)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound("Batch not found".to_string()))
}

pub async fn update(pool: &SqlitePool, id: i64, fields: &BatchUpdate) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE batches
        SET batch_name = ?, status = ?, mode = ?, start_date = ?, end_date = ?,
            domain = ?, trainer_name = ?, start_time = ?, end_time = ?
        WHERE id = ?
        "#,
    )
    .bind(&fields.batch_name)
    .bind(&fields.status)
    .bind(&fields.mode)
    .bind(&fields.start_date)
    .bind(&fields.end_date)
    .bind(&fields.domain)
    .bind(&fields.trainer_name)
    .bind(&fields.start_time)
    .bind(&fields.end_time)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("Batch not found".to_string()));
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM batches WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("Batch not found".to_string()));
    }
    Ok(())
}

pub async fn search(pool: &SqlitePool, filter: &BatchSearch) -> Result<Vec<Batch>> {
    let mut sql = "SELECT * FROM batches WHERE 1=1".to_string();
    let mut binds: Vec<String> = Vec::new();

    if let Some(batch_name) = &filter.batch_name {
        sql.push_str(" AND batch_name LIKE ?");
        binds.push(format!("%{}%", batch_name));
    }
    if let Some(start_date) = &filter.start_date {
        sql.push_str(" AND start_date = ?");
        binds.push(start_date.clone());
    }
    if let Some(end_date) = &filter.end_date {
        sql.push_str(" AND end_date = ?");
        binds.push(end_date.clone());
    }
    if let Some(mode) = &filter.mode {
        sql.push_str(" AND mode = ?");
        binds.push(mode.clone());
    }

    let mut query = sqlx::query_as::<_, Batch>(&sql);
    for value in &binds {
        query = query.bind(value);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Move a student to another batch and append an audit row.
///
/// The target batch is resolved by name. The "from" batch name is captured
/// before the student row is updated, so the audit trail records the batch
/// the student actually left.
pub async fn transfer_student(
    pool: &SqlitePool,
    booking_id: &str,
    req: &TransferRequest,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let target_id: Option<i64> = sqlx::query_scalar("SELECT id FROM batches WHERE batch_name = ?")
        .bind(&req.to_batch)
        .fetch_optional(&mut *tx)
        .await?;
    let target_id = target_id.ok_or_else(|| Error::NotFound("Batch not found".to_string()))?;

    let from_batch: Option<String> = sqlx::query_scalar(
        r#"
        SELECT b.batch_name
        FROM batches b
        JOIN students s ON b.id = s.batch_id
        WHERE s.booking_id = ?
        "#,
    )
    .bind(booking_id)
    .fetch_optional(&mut *tx)
    .await?;

    sqlx::query("UPDATE students SET batch_id = ? WHERE booking_id = ?")
        .bind(target_id)
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO batch_changes
            (booking_id, from_batch, to_batch, domain, reason, attachment_url, requested_by)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(booking_id)
    .bind(&from_batch)
    .bind(&req.to_batch)
    .bind(&req.domain)
    .bind(&req.reason)
    .bind(&req.attachment_url)
    .bind(&req.requested_by)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
