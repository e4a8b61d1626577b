//! Owner report queries
//!
//! Read-only projections for the placement-ops head: student search by
//! domain/batch, placed and yet-to-place listings, EPIC report rows and
//! the per-student drill-down. Domain filters resolve to batch number
//! prefixes through the normalizer.

use placetrack_common::{domain, Error, Result};
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct StudentReportRow {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub batch: Option<String>,
    pub placement: String,
    pub booking_id: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PlacementReportRow {
    pub name: Option<String>,
    pub company: Option<String>,
    pub designation: Option<String>,
    pub salary: Option<f64>,
    pub batch: Option<String>,
    pub booking_id: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct EpicReportRow {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub batch: Option<String>,
    pub attendance: Option<f64>,
    pub epic_status: String,
    pub booking_id: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct StudentDetail {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub batch: Option<String>,
    pub placement: String,
    pub epic_status: String,
    pub attendance: Option<f64>,
    pub company: Option<String>,
    pub designation: Option<String>,
    pub salary: Option<f64>,
    pub mode: Option<String>,
    pub trainer_name: Option<String>,
    pub domain_score: Option<f64>,
    pub aptitude_score: Option<f64>,
    pub communication_score: Option<f64>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct BatchSummary {
    pub batch_no: String,
    pub trainer_name: Option<String>,
    pub mode: Option<String>,
    pub status: Option<String>,
}

/// Domain dropdown entries for the owner report screens.
#[derive(Debug, Serialize)]
pub struct DomainOption {
    pub key: &'static str,
    pub label: &'static str,
}

pub fn domain_options() -> Vec<DomainOption> {
    vec![
        DomainOption { key: "fullstack", label: "Full Stack Development" },
        DomainOption { key: "dataanalytics", label: "Data Analytics & Science" },
        DomainOption { key: "marketing", label: "Digital Marketing" },
        DomainOption { key: "sap", label: "SAP" },
        DomainOption { key: "banking", label: "Banking & Financial Services" },
        DomainOption { key: "devops", label: "DevOps" },
    ]
}

/// Append domain-prefix and exact-batch filters to a student query.
/// An unknown domain key is a validation failure, not an empty result.
fn batch_filters(
    sql: &mut String,
    binds: &mut Vec<String>,
    domain_key: Option<&str>,
    batch: Option<&str>,
) -> Result<()> {
    if let Some(key) = domain_key {
        let prefix = domain::batch_prefix(key)
            .ok_or_else(|| Error::Validation("Invalid domain".to_string()))?;
        sql.push_str(" AND batch_no LIKE ?");
        binds.push(format!("{}%", prefix));
    }
    if let Some(batch) = batch {
        sql.push_str(" AND batch_no = ?");
        binds.push(batch.to_string());
    }
    Ok(())
}

async fn fetch_with_filters<T>(
    pool: &SqlitePool,
    base_sql: &str,
    domain_key: Option<&str>,
    batch: Option<&str>,
) -> Result<Vec<T>>
where
    T: for<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
{
    let mut sql = base_sql.to_string();
    let mut binds = Vec::new();
    batch_filters(&mut sql, &mut binds, domain_key, batch)?;

    let mut query = sqlx::query_as::<_, T>(&sql);
    for value in &binds {
        query = query.bind(value);
    }
    Ok(query.fetch_all(pool).await?)
}

pub async fn students_report(
    pool: &SqlitePool,
    domain_key: Option<&str>,
    batch: Option<&str>,
) -> Result<Vec<StudentReportRow>> {
    fetch_with_filters(
        pool,
        "SELECT name, email, phone, batch_no AS batch, placement, booking_id FROM students WHERE 1=1",
        domain_key,
        batch,
    )
    .await
}

pub async fn placements_report(
    pool: &SqlitePool,
    domain_key: Option<&str>,
    batch: Option<&str>,
) -> Result<Vec<PlacementReportRow>> {
    fetch_with_filters(
        pool,
        "SELECT name, company, designation, salary, batch_no AS batch, booking_id FROM students WHERE placement = 'Placed'",
        domain_key,
        batch,
    )
    .await
}

pub async fn epic_report(
    pool: &SqlitePool,
    domain_key: Option<&str>,
    batch: Option<&str>,
) -> Result<Vec<EpicReportRow>> {
    fetch_with_filters(
        pool,
        "SELECT name, email, phone, batch_no AS batch, attendance, epic_status, booking_id FROM students WHERE 1=1",
        domain_key,
        batch,
    )
    .await
}

pub async fn yet_to_place_report(
    pool: &SqlitePool,
    domain_key: Option<&str>,
    batch: Option<&str>,
) -> Result<Vec<EpicReportRow>> {
    fetch_with_filters(
        pool,
        "SELECT name, email, phone, batch_no AS batch, attendance, epic_status, booking_id FROM students WHERE placement = 'Yet to Place'",
        domain_key,
        batch,
    )
    .await
}

pub async fn student_detail(pool: &SqlitePool, booking_id: &str) -> Result<StudentDetail> {
    sqlx::query_as::<_, StudentDetail>(
        r#"
        SELECT name, email, phone, batch_no AS batch, placement, epic_status, attendance,
               company, designation, salary, mode, trainer_name,
               domain_score, aptitude_score, communication_score
        FROM students
        WHERE booking_id = ?
        "#,
    )
    .bind(booking_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound("Student not found".to_string()))
}

/// Batches of a domain, resolved by prefix, ordered by batch number.
pub async fn batches_by_domain(pool: &SqlitePool, domain_key: &str) -> Result<Vec<BatchSummary>> {
    let prefix = domain::batch_prefix(domain_key)
        .ok_or_else(|| Error::Validation("Invalid domain".to_string()))?;

    Ok(sqlx::query_as::<_, BatchSummary>(
        "SELECT batch_no, trainer_name, mode, status FROM batches WHERE batch_no LIKE ? ORDER BY batch_no",
    )
    .bind(format!("{}%", prefix))
    .fetch_all(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn seed(pool: &SqlitePool) {
        for (booking, batch_no, placement) in [
            ("BK1", "FS01", "Placed"),
            ("BK2", "FS02", "Yet to Place"),
            ("BK3", "DA01", "Placed"),
        ] {
            sqlx::query(
                "INSERT INTO students (booking_id, name, batch_no, placement) VALUES (?, ?, ?, ?)",
            )
            .bind(booking)
            .bind(format!("student-{}", booking))
            .bind(batch_no)
            .bind(placement)
            .execute(pool)
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn domain_filter_uses_batch_prefix() {
        let pool = test_pool().await;
        seed(&pool).await;

        let rows = students_report(&pool, Some("fullstack"), None).await.unwrap();
        assert_eq!(rows.len(), 2);

        let rows = students_report(&pool, Some("fullstack"), Some("FS01"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].booking_id, "BK1");

        let err = students_report(&pool, Some("robotics"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn placements_report_only_sees_placed() {
        let pool = test_pool().await;
        seed(&pool).await;

        let rows = placements_report(&pool, None, None).await.unwrap();
        assert_eq!(rows.len(), 2);

        let rows = yet_to_place_report(&pool, Some("fullstack"), None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].booking_id, "BK2");
    }

    #[tokio::test]
    async fn student_detail_reports_not_found() {
        let pool = test_pool().await;
        seed(&pool).await;

        let detail = student_detail(&pool, "BK1").await.unwrap();
        assert_eq!(detail.batch.as_deref(), Some("FS01"));

        assert!(matches!(
            student_detail(&pool, "BK99").await.unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn batches_by_domain_orders_by_batch_no() {
        let pool = test_pool().await;
        for batch_no in ["FS02", "FS01", "DA01"] {
            sqlx::query("INSERT INTO batches (batch_no, status) VALUES (?, 'Ongoing')")
                .bind(batch_no)
                .execute(&pool)
                .await
                .unwrap();
        }

        let rows = batches_by_domain(&pool, "fullstack").await.unwrap();
        let numbers: Vec<&str> = rows.iter().map(|b| b.batch_no.as_str()).collect();
        assert_eq!(numbers, vec!["FS01", "FS02"]);

        assert_eq!(domain_options().len(), 6);
    }
}
