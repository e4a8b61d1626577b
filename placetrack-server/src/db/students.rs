//! Student repository
//!
//! The student row carries the full admission profile plus scoring and
//! placement-outcome fields. Writes arrive from three surfaces: the bulk
//! import (create), the placement-status PUT (single field), and the SME
//! dashboard (partial update of any field).

use placetrack_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Student record as stored.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Student {
    pub id: i64,
    pub batch_id: Option<i64>,
    pub batch_no: Option<String>,
    pub batch_name: Option<String>,
    pub booking_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub alternate_phone: Option<String>,
    pub mode: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub photo_url: Option<String>,
    pub cv_url: Option<String>,
    pub tenth_percentage: Option<f64>,
    pub tenth_year: Option<i64>,
    pub twelfth_percentage: Option<f64>,
    pub twelfth_year: Option<i64>,
    pub ug: Option<String>,
    pub ug_percentage: Option<f64>,
    pub ug_mode: Option<String>,
    pub ug_specialization: Option<String>,
    pub ug_year: Option<i64>,
    pub ug_certificate_available: i64,
    pub ug_arrears_pending: Option<String>,
    pub pg: Option<String>,
    pub pg_percentage: Option<f64>,
    pub pg_specialization: Option<String>,
    pub pg_year: Option<i64>,
    pub pg_certificate_available: i64,
    pub pg_arrears_pending: Option<String>,
    pub gap_in_education: Option<String>,
    pub gap_reason: Option<String>,
    pub work_experience_years: Option<i64>,
    pub work_experience_months: Option<i64>,
    pub previous_organisation: Option<String>,
    pub experience: Option<String>,
    pub willing_to_relocate: i64,
    pub languages_write: Option<String>,
    pub languages_read: Option<String>,
    pub languages_speak: Option<String>,
    pub certificate_received: String,
    pub epic_status: String,
    pub placement: String,
    pub status: Option<String>,
    pub domain: Option<String>,
    pub trainer_name: Option<String>,
    pub company: Option<String>,
    pub designation: Option<String>,
    pub salary: Option<f64>,
    pub placed_month: Option<String>,
    pub domain_score: Option<f64>,
    pub aptitude_score: Option<f64>,
    pub communication_score: Option<f64>,
    pub attendance: Option<f64>,
    pub mile1: Option<f64>,
    pub mile2: Option<f64>,
    pub mile3: Option<f64>,
    pub irc: Option<f64>,
    pub created_at: String,
}

/// One record of a bulk import request. Every field is optional; the
/// defaulting rules in `bulk_insert` fill the gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BulkStudent {
    pub batch_id: Option<i64>,
    pub batch_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub booking_id: Option<String>,
    pub batch_no: Option<String>,
    pub domain: Option<String>,
    pub phone: Option<String>,
    pub alternate_phone: Option<String>,
    pub mode: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub photo_url: Option<String>,
    pub cv_url: Option<String>,
    pub tenth_percentage: Option<f64>,
    pub tenth_year: Option<i64>,
    pub twelfth_percentage: Option<f64>,
    pub twelfth_year: Option<i64>,
    pub ug_percentage: Option<f64>,
    pub ug_mode: Option<String>,
    pub ug_specialization: Option<String>,
    pub ug_year: Option<i64>,
    pub ug_certificate_available: bool,
    pub ug_arrears_pending: Option<String>,
    pub pg_percentage: Option<f64>,
    pub pg_specialization: Option<String>,
    pub pg_year: Option<i64>,
    pub pg_certificate_available: bool,
    pub pg_arrears_pending: Option<String>,
    pub gap_in_education: Option<String>,
    pub gap_reason: Option<String>,
    pub work_experience_years: Option<i64>,
    pub work_experience_months: Option<i64>,
    pub previous_organisation: Option<String>,
    pub willing_to_relocate: bool,
    pub languages_write: Option<String>,
    pub languages_read: Option<String>,
    pub languages_speak: Option<String>,
    pub certificate_received: Option<String>,
    pub epic_status: Option<String>,
    pub placement: Option<String>,
    pub status: Option<String>,
    pub trainer_name: Option<String>,
}

/// Fields accepted by the SME create-student route.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewStudent {
    pub booking_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub batch_no: Option<String>,
    pub mode: Option<String>,
    pub epic_status: Option<String>,
    pub placement: Option<String>,
    pub company: Option<String>,
    pub designation: Option<String>,
    pub salary: Option<f64>,
    pub placed_month: Option<String>,
    pub domain_score: Option<f64>,
    pub aptitude_score: Option<f64>,
    pub communication_score: Option<f64>,
    pub address: Option<String>,
    pub ug: Option<String>,
    pub pg: Option<String>,
    pub experience: Option<String>,
    pub attendance: Option<f64>,
    pub mile1: Option<f64>,
    pub mile2: Option<f64>,
    pub mile3: Option<f64>,
    pub irc: Option<f64>,
    pub status: Option<String>,
    pub trainer_name: Option<String>,
    pub domain: Option<String>,
}

/// Distinguishes an absent field (skip the column) from an explicit JSON
/// `null` (clear the column). Serde collapses both to `None` without this.
fn present<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Partial update accepted by the SME edit route. Only present fields are
/// written; a JSON `null` clears the column.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StudentUpdate {
    #[serde(deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub batch_no: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub mode: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub epic_status: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub placement: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub company: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub designation: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub salary: Option<Option<f64>>,
    #[serde(deserialize_with = "present")]
    pub placed_month: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub domain_score: Option<Option<f64>>,
    #[serde(deserialize_with = "present")]
    pub aptitude_score: Option<Option<f64>>,
    #[serde(deserialize_with = "present")]
    pub communication_score: Option<Option<f64>>,
    #[serde(deserialize_with = "present")]
    pub address: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub ug: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub pg: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub experience: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub attendance: Option<Option<f64>>,
    #[serde(deserialize_with = "present")]
    pub mile1: Option<Option<f64>>,
    #[serde(deserialize_with = "present")]
    pub mile2: Option<Option<f64>>,
    #[serde(deserialize_with = "present")]
    pub mile3: Option<Option<f64>>,
    #[serde(deserialize_with = "present")]
    pub irc: Option<Option<f64>>,
    #[serde(deserialize_with = "present")]
    pub status: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub trainer_name: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub domain: Option<Option<String>>,
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Student>> {
    Ok(sqlx::query_as::<_, Student>("SELECT * FROM students")
        .fetch_all(pool)
        .await?)
}

pub async fn get_by_booking_id(pool: &SqlitePool, booking_id: &str) -> Result<Student> {
    sqlx::query_as::<_, Student>("SELECT * FROM students WHERE booking_id = ?")
        .bind(booking_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound("Student not found".to_string()))
}

pub async fn exists(pool: &SqlitePool, booking_id: &str) -> Result<bool> {
    let found: Option<String> =
        sqlx::query_scalar("SELECT booking_id FROM students WHERE booking_id = ?")
            .bind(booking_id)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

/// Students of a batch, matched on the human-entered batch name.
pub async fn by_batch_name(pool: &SqlitePool, batch_name: &str) -> Result<Vec<Student>> {
    Ok(
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE batch_name = ?")
            .bind(batch_name)
            .fetch_all(pool)
            .await?,
    )
}

pub async fn by_batch_name_and_epic(
    pool: &SqlitePool,
    batch_name: &str,
    epic_status: &str,
) -> Result<Vec<Student>> {
    Ok(sqlx::query_as::<_, Student>(
        "SELECT * FROM students WHERE batch_name = ? AND epic_status = ?",
    )
    .bind(batch_name)
    .bind(epic_status)
    .fetch_all(pool)
    .await?)
}

/// Students of a batch, matched on the batch number (SME surface).
pub async fn by_batch_no(pool: &SqlitePool, batch_no: &str) -> Result<Vec<Student>> {
    Ok(
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE batch_no = ?")
            .bind(batch_no)
            .fetch_all(pool)
            .await?,
    )
}

/// SME search: batch number substring match, everything when no query.
pub async fn search_by_batch_no(pool: &SqlitePool, query: Option<&str>) -> Result<Vec<Student>> {
    match query {
        Some(q) => Ok(
            sqlx::query_as::<_, Student>("SELECT * FROM students WHERE batch_no LIKE ?")
                .bind(format!("%{}%", q))
                .fetch_all(pool)
                .await?,
        ),
        None => list_all(pool).await,
    }
}

pub async fn placed(pool: &SqlitePool) -> Result<Vec<Student>> {
    Ok(
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE placement = 'Placed'")
            .fetch_all(pool)
            .await?,
    )
}

/// Filter by numeric batch id and/or placement status. The handler
/// requires at least one of the two.
pub async fn filter_by_batch_id(
    pool: &SqlitePool,
    batch_id: Option<i64>,
    placement: Option<&str>,
) -> Result<Vec<Student>> {
    let mut sql = "SELECT * FROM students WHERE 1=1".to_string();
    if batch_id.is_some() {
        sql.push_str(" AND batch_id = ?");
    }
    if placement.is_some() {
        sql.push_str(" AND placement = ?");
    }

    let mut query = sqlx::query_as::<_, Student>(&sql);
    if let Some(id) = batch_id {
        query = query.bind(id);
    }
    if let Some(p) = placement {
        query = query.bind(p.to_string());
    }
    Ok(query.fetch_all(pool).await?)
}

/// Filter by batch name, status and/or placement; used by `/students/filter`.
pub async fn filter(
    pool: &SqlitePool,
    batch_name: Option<&str>,
    status: Option<&str>,
    placement: Option<&str>,
) -> Result<Vec<Student>> {
    let mut sql = "SELECT * FROM students WHERE 1=1".to_string();
    let mut binds: Vec<String> = Vec::new();

    if let Some(b) = batch_name {
        sql.push_str(" AND batch_name = ?");
        binds.push(b.to_string());
    }
    if let Some(s) = status {
        sql.push_str(" AND status = ?");
        binds.push(s.to_string());
    }
    if let Some(p) = placement {
        sql.push_str(" AND placement = ?");
        binds.push(p.to_string());
    }

    let mut query = sqlx::query_as::<_, Student>(&sql);
    for value in &binds {
        query = query.bind(value);
    }
    Ok(query.fetch_all(pool).await?)
}

pub async fn update_placement(pool: &SqlitePool, booking_id: &str, status: &str) -> Result<()> {
    let result = sqlx::query("UPDATE students SET placement = ? WHERE booking_id = ?")
        .bind(status)
        .bind(booking_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("Student not found".to_string()));
    }
    Ok(())
}

const BULK_COLUMNS: &str = "batch_id, batch_name, name, email, booking_id, batch_no, domain, phone, \
     alternate_phone, mode, gender, dob, address, pincode, city, state, photo_url, cv_url, \
     tenth_percentage, tenth_year, twelfth_percentage, twelfth_year, \
     ug_percentage, ug_mode, ug_specialization, ug_year, ug_certificate_available, ug_arrears_pending, \
     pg_percentage, pg_specialization, pg_year, pg_certificate_available, pg_arrears_pending, \
     gap_in_education, gap_reason, work_experience_years, work_experience_months, \
     previous_organisation, willing_to_relocate, languages_write, languages_read, languages_speak, \
     certificate_received, epic_status, placement, status, trainer_name";

const BULK_FIELD_COUNT: usize = 47;

/// Insert a batch of students in one multi-row statement.
///
/// Missing optional fields take fixed defaults: empty string for the
/// identity/text columns, NULL for numeric/date/profile columns, 0 for
/// boolean flags, "N" for the certificate flag and "on going" for status.
/// The aggregation queries rely on these exact defaults. The path batch
/// identifier fills each record's missing batch name. A failure anywhere
/// (e.g. a duplicate booking id) fails the whole statement; no rows stick.
pub async fn bulk_insert(
    pool: &SqlitePool,
    batch_name: &str,
    records: &[BulkStudent],
) -> Result<u64> {
    if records.is_empty() {
        return Err(Error::Validation("No student data provided".to_string()));
    }

    let row_placeholders = format!("({})", vec!["?"; BULK_FIELD_COUNT].join(", "));
    let all_placeholders = vec![row_placeholders; records.len()].join(", ");
    let sql = format!(
        "INSERT INTO students ({}) VALUES {}",
        BULK_COLUMNS, all_placeholders
    );

    let mut query = sqlx::query(&sql);
    for s in records {
        query = query
            .bind(s.batch_id)
            .bind(s.batch_name.clone().unwrap_or_else(|| batch_name.to_string()))
            .bind(s.name.clone().unwrap_or_default())
            .bind(s.email.clone().unwrap_or_default())
            .bind(s.booking_id.clone().unwrap_or_default())
            .bind(s.batch_no.clone().unwrap_or_default())
            .bind(s.domain.clone().unwrap_or_default())
            .bind(s.phone.clone().unwrap_or_default())
            .bind(&s.alternate_phone)
            .bind(s.mode.clone().unwrap_or_default())
            .bind(&s.gender)
            .bind(&s.dob)
            .bind(&s.address)
            .bind(&s.pincode)
            .bind(&s.city)
            .bind(&s.state)
            .bind(&s.photo_url)
            .bind(&s.cv_url)
            .bind(s.tenth_percentage)
            .bind(s.tenth_year)
            .bind(s.twelfth_percentage)
            .bind(s.twelfth_year)
            .bind(s.ug_percentage)
            .bind(&s.ug_mode)
            .bind(&s.ug_specialization)
            .bind(s.ug_year)
            .bind(s.ug_certificate_available as i64)
            .bind(&s.ug_arrears_pending)
            .bind(s.pg_percentage)
            .bind(&s.pg_specialization)
            .bind(s.pg_year)
            .bind(s.pg_certificate_available as i64)
            .bind(&s.pg_arrears_pending)
            .bind(&s.gap_in_education)
            .bind(&s.gap_reason)
            .bind(s.work_experience_years)
            .bind(s.work_experience_months)
            .bind(&s.previous_organisation)
            .bind(s.willing_to_relocate as i64)
            .bind(&s.languages_write)
            .bind(&s.languages_read)
            .bind(&s.languages_speak)
            .bind(s.certificate_received.clone().unwrap_or_else(|| "N".to_string()))
            .bind(s.epic_status.clone().unwrap_or_default())
            .bind(s.placement.clone().unwrap_or_default())
            .bind(s.status.clone().unwrap_or_else(|| "on going".to_string()))
            .bind(&s.trainer_name);
    }

    let result = query
        .execute(pool)
        .await
        .map_err(|e| Error::from_sqlx(e, "Duplicate booking id in import"))?;
    Ok(result.rows_affected())
}

/// SME create: requires a booking id; score columns default to 0.
pub async fn create(pool: &SqlitePool, s: &NewStudent) -> Result<i64> {
    let booking_id = s
        .booking_id
        .as_deref()
        .filter(|b| !b.is_empty())
        .ok_or_else(|| Error::Validation("booking_id is required".to_string()))?;

    let result = sqlx::query(
        r#"
        INSERT INTO students
            (booking_id, name, email, phone, batch_no, mode, epic_status, placement,
             company, designation, salary, placed_month,
             domain_score, aptitude_score, communication_score,
             address, ug, pg, experience, attendance, mile1, mile2, mile3, irc,
             status, trainer_name, domain)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(booking_id)
    .bind(&s.name)
    .bind(&s.email)
    .bind(&s.phone)
    .bind(&s.batch_no)
    .bind(&s.mode)
    .bind(s.epic_status.clone().unwrap_or_default())
    .bind(s.placement.clone().unwrap_or_default())
    .bind(&s.company)
    .bind(&s.designation)
    .bind(s.salary)
    .bind(&s.placed_month)
    .bind(s.domain_score.unwrap_or(0.0))
    .bind(s.aptitude_score.unwrap_or(0.0))
    .bind(s.communication_score.unwrap_or(0.0))
    .bind(&s.address)
    .bind(&s.ug)
    .bind(&s.pg)
    .bind(&s.experience)
    .bind(s.attendance)
    .bind(s.mile1)
    .bind(s.mile2)
    .bind(s.mile3)
    .bind(s.irc)
    .bind(&s.status)
    .bind(&s.trainer_name)
    .bind(&s.domain)
    .execute(pool)
    .await
    .map_err(|e| Error::from_sqlx(e, "Booking id already exists"))?;

    Ok(result.last_insert_rowid())
}

macro_rules! push_field {
    ($fields:ident, $args:ident, $update:expr, $name:literal) => {
        if let Some(value) = &$update {
            $fields.push(concat!($name, " = ?"));
            $args.push(match value {
                Some(v) => FieldValue::from(v.clone()),
                None => FieldValue::Null,
            });
        }
    };
}

enum FieldValue {
    Text(String),
    Real(f64),
    Null,
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Real(v)
    }
}

/// SME partial update: only present fields enter the SET clause. Returns
/// `Validation` when nothing is present and `NotFound` when zero rows
/// match the booking id.
pub async fn update(pool: &SqlitePool, booking_id: &str, u: &StudentUpdate) -> Result<()> {
    let mut fields: Vec<&'static str> = Vec::new();
    let mut args: Vec<FieldValue> = Vec::new();

    push_field!(fields, args, u.name, "name");
    push_field!(fields, args, u.email, "email");
    push_field!(fields, args, u.phone, "phone");
    push_field!(fields, args, u.batch_no, "batch_no");
    push_field!(fields, args, u.mode, "mode");
    push_field!(fields, args, u.epic_status, "epic_status");
    push_field!(fields, args, u.placement, "placement");
    push_field!(fields, args, u.company, "company");
    push_field!(fields, args, u.designation, "designation");
    push_field!(fields, args, u.salary, "salary");
    push_field!(fields, args, u.placed_month, "placed_month");
    push_field!(fields, args, u.domain_score, "domain_score");
    push_field!(fields, args, u.aptitude_score, "aptitude_score");
    push_field!(fields, args, u.communication_score, "communication_score");
    push_field!(fields, args, u.address, "address");
    push_field!(fields, args, u.ug, "ug");
    push_field!(fields, args, u.pg, "pg");
    push_field!(fields, args, u.experience, "experience");
    push_field!(fields, args, u.attendance, "attendance");
    push_field!(fields, args, u.mile1, "mile1");
    push_field!(fields, args, u.mile2, "mile2");
    push_field!(fields, args, u.mile3, "mile3");
    push_field!(fields, args, u.irc, "irc");
    push_field!(fields, args, u.status, "status");
    push_field!(fields, args, u.trainer_name, "trainer_name");
    push_field!(fields, args, u.domain, "domain");

    if fields.is_empty() {
        return Err(Error::Validation("No fields to update".to_string()));
    }

    let sql = format!(
        "UPDATE students SET {} WHERE booking_id = ?",
        fields.join(", ")
    );
    let mut query = sqlx::query(&sql);
    for arg in args {
        query = match arg {
            FieldValue::Text(v) => query.bind(v),
            FieldValue::Real(v) => query.bind(v),
            FieldValue::Null => query.bind(None::<String>),
        };
    }
    let result = query.bind(booking_id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("Student not found".to_string()));
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, booking_id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM students WHERE booking_id = ?")
        .bind(booking_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("Student not found".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn bulk_insert_applies_defaults() {
        let pool = test_pool().await;

        let records = vec![
            BulkStudent {
                booking_id: Some("BK100".to_string()),
                name: Some("Ravi".to_string()),
                batch_no: Some("FS01".to_string()),
                ..Default::default()
            },
            BulkStudent {
                booking_id: Some("BK101".to_string()),
                batch_name: Some("Custom Batch".to_string()),
                ug_certificate_available: true,
                ..Default::default()
            },
        ];

        let inserted = bulk_insert(&pool, "FS Batch 1", &records).await.unwrap();
        assert_eq!(inserted, 2);

        let first = get_by_booking_id(&pool, "BK100").await.unwrap();
        assert_eq!(first.epic_status, "");
        assert_eq!(first.placement, "");
        assert_eq!(first.status.as_deref(), Some("on going"));
        assert_eq!(first.certificate_received, "N");
        assert_eq!(first.batch_name.as_deref(), Some("FS Batch 1"));
        assert_eq!(first.ug_certificate_available, 0);
        assert_eq!(first.salary, None);

        let second = get_by_booking_id(&pool, "BK101").await.unwrap();
        assert_eq!(second.batch_name.as_deref(), Some("Custom Batch"));
        assert_eq!(second.ug_certificate_available, 1);
    }

    #[tokio::test]
    async fn bulk_insert_rejects_empty_input() {
        let pool = test_pool().await;
        let err = bulk_insert(&pool, "FS01", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn bulk_insert_is_atomic_on_duplicate() {
        let pool = test_pool().await;
        bulk_insert(
            &pool,
            "FS01",
            &[BulkStudent {
                booking_id: Some("BK100".to_string()),
                ..Default::default()
            }],
        )
        .await
        .unwrap();

        let records = vec![
            BulkStudent {
                booking_id: Some("BK200".to_string()),
                ..Default::default()
            },
            BulkStudent {
                booking_id: Some("BK100".to_string()),
                ..Default::default()
            },
        ];
        let err = bulk_insert(&pool, "FS01", &records).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        // The statement failed as a whole; BK200 must not exist
        assert!(!exists(&pool, "BK200").await.unwrap());
    }

    #[tokio::test]
    async fn create_requires_booking_id_and_defaults_scores() {
        let pool = test_pool().await;

        let err = create(&pool, &NewStudent::default()).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let id = create(
            &pool,
            &NewStudent {
                booking_id: Some("BK300".to_string()),
                name: Some("Meera".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(id > 0);

        let student = get_by_booking_id(&pool, "BK300").await.unwrap();
        assert_eq!(student.domain_score, Some(0.0));
        assert_eq!(student.aptitude_score, Some(0.0));
        assert_eq!(student.communication_score, Some(0.0));
        assert_eq!(student.mile1, None);
    }

    #[tokio::test]
    async fn partial_update_touches_only_present_fields() {
        let pool = test_pool().await;
        create(
            &pool,
            &NewStudent {
                booking_id: Some("BK300".to_string()),
                name: Some("Meera".to_string()),
                placement: Some("Yet to Place".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        update(
            &pool,
            "BK300",
            &StudentUpdate {
                placement: Some(Some("Placed".to_string())),
                company: Some(Some("Initech".to_string())),
                salary: Some(Some(4.5)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let student = get_by_booking_id(&pool, "BK300").await.unwrap();
        assert_eq!(student.placement, "Placed");
        assert_eq!(student.company.as_deref(), Some("Initech"));
        assert_eq!(student.salary, Some(4.5));
        // Untouched field survives
        assert_eq!(student.name.as_deref(), Some("Meera"));

        let err = update(&pool, "BK300", &StudentUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = update(
            &pool,
            "BK999",
            &StudentUpdate {
                name: Some(Some("x".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn placement_update_and_delete() {
        let pool = test_pool().await;
        create(
            &pool,
            &NewStudent {
                booking_id: Some("BK400".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        update_placement(&pool, "BK400", "Ineligible").await.unwrap();
        let student = get_by_booking_id(&pool, "BK400").await.unwrap();
        assert_eq!(student.placement, "Ineligible");

        delete(&pool, "BK400").await.unwrap();
        let err = delete(&pool, "BK400").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
