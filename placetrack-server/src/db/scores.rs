//! Score repository
//!
//! One score row per student booking id. The create path is an upsert
//! (single statement, atomic); the update path deliberately requires an
//! existing row and so can never create one. Both require the student to
//! exist first.

use crate::db::students;
use placetrack_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Score {
    pub id: i64,
    pub booking_id: String,
    pub mile1: Option<f64>,
    pub mile2: Option<f64>,
    pub mile3: Option<f64>,
    pub irc: Option<f64>,
    pub epic_status: Option<String>,
    pub attendance: Option<f64>,
    pub updated_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScoreFields {
    pub mile1: Option<f64>,
    pub mile2: Option<f64>,
    pub mile3: Option<f64>,
    pub irc: Option<f64>,
    pub epic_status: Option<String>,
    pub attendance: Option<f64>,
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Score>> {
    Ok(sqlx::query_as::<_, Score>("SELECT * FROM scores")
        .fetch_all(pool)
        .await?)
}

async fn require_student(pool: &SqlitePool, booking_id: &str) -> Result<()> {
    if !students::exists(pool, booking_id).await? {
        return Err(Error::Validation(format!(
            "booking_id {} not found in students table",
            booking_id
        )));
    }
    Ok(())
}

/// Insert or update the score row for a student.
pub async fn upsert(pool: &SqlitePool, booking_id: &str, fields: &ScoreFields) -> Result<()> {
    require_student(pool, booking_id).await?;

    sqlx::query(
        r#"
        INSERT INTO scores (booking_id, mile1, mile2, mile3, irc, epic_status, attendance)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(booking_id) DO UPDATE SET
            mile1 = excluded.mile1,
            mile2 = excluded.mile2,
            mile3 = excluded.mile3,
            irc = excluded.irc,
            epic_status = excluded.epic_status,
            attendance = excluded.attendance,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(booking_id)
    .bind(fields.mile1)
    .bind(fields.mile2)
    .bind(fields.mile3)
    .bind(fields.irc)
    .bind(&fields.epic_status)
    .bind(fields.attendance)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update an existing score row. Unlike `upsert`, a missing row is an
/// error: this path cannot create the first score record.
pub async fn update(pool: &SqlitePool, booking_id: &str, fields: &ScoreFields) -> Result<u64> {
    require_student(pool, booking_id).await?;

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM scores WHERE booking_id = ?")
        .bind(booking_id)
        .fetch_optional(pool)
        .await?;
    if existing.is_none() {
        return Err(Error::NotFound(format!(
            "No score record found for booking_id: {}",
            booking_id
        )));
    }

    let result = sqlx::query(
        r#"
        UPDATE scores
        SET mile1 = ?, mile2 = ?, mile3 = ?, irc = ?, epic_status = ?, attendance = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE booking_id = ?
        "#,
    )
    .bind(fields.mile1)
    .bind(fields.mile2)
    .bind(fields.mile3)
    .bind(fields.irc)
    .bind(&fields.epic_status)
    .bind(fields.attendance)
    .bind(booking_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
