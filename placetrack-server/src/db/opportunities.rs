//! Opportunity repository
//!
//! Company drive records plus the opportunity/student junction. Student
//! assignment is destructive on reassign: all junction rows for the
//! opportunity are replaced by the new list.

use crate::db::students::Student;
use placetrack_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Opportunity {
    pub id: i64,
    pub company_name: String,
    pub drive_date: Option<String>,
    pub drive_role: Option<String>,
    pub package: Option<f64>,
    pub selected_batch: Option<String>,
    pub domain: Option<String>,
    pub created_domain: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OpportunityFields {
    pub company_name: String,
    pub drive_date: Option<String>,
    pub drive_role: Option<String>,
    pub package: Option<f64>,
    pub selected_batch: Option<String>,
    pub domain: Option<String>,
    pub created_domain: Option<String>,
}

pub async fn create(pool: &SqlitePool, fields: &OpportunityFields) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO opportunities
            (company_name, drive_date, drive_role, package, selected_batch, domain, created_domain)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&fields.company_name)
    .bind(&fields.drive_date)
    .bind(&fields.drive_role)
    .bind(fields.package)
    .bind(&fields.selected_batch)
    .bind(&fields.domain)
    .bind(&fields.created_domain)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Opportunity>> {
    Ok(sqlx::query_as::<_, Opportunity>("SELECT * FROM opportunities")
        .fetch_all(pool)
        .await?)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Opportunity> {
    sqlx::query_as::<_, Opportunity>("SELECT * FROM opportunities WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound("Opportunity not found".to_string()))
}

pub async fn update(pool: &SqlitePool, id: i64, fields: &OpportunityFields) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE opportunities
        SET company_name = ?, drive_date = ?, drive_role = ?, package = ?,
            selected_batch = ?, domain = ?, created_domain = ?
        WHERE id = ?
        "#,
    )
    .bind(&fields.company_name)
    .bind(&fields.drive_date)
    .bind(&fields.drive_role)
    .bind(fields.package)
    .bind(&fields.selected_batch)
    .bind(&fields.domain)
    .bind(&fields.created_domain)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("Opportunity not found".to_string()));
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM opportunities WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("Opportunity not found".to_string()));
    }
    Ok(())
}

/// Students currently assigned to an opportunity, via the junction table.
pub async fn students_for(pool: &SqlitePool, opportunity_id: i64) -> Result<Vec<Student>> {
    Ok(sqlx::query_as::<_, Student>(
        r#"
        SELECT s.*
        FROM students s
        INNER JOIN opportunity_students os ON s.booking_id = os.student_booking_id
        WHERE os.opportunity_id = ?
        "#,
    )
    .bind(opportunity_id)
    .fetch_all(pool)
    .await?)
}

fn insert_pairs_sql(count: usize) -> String {
    let placeholders = vec!["(?, ?)"; count].join(", ");
    format!(
        "INSERT INTO opportunity_students (opportunity_id, student_booking_id) VALUES {}",
        placeholders
    )
}

/// Assign students to an opportunity (additive).
pub async fn assign_students(
    pool: &SqlitePool,
    opportunity_id: i64,
    booking_ids: &[String],
) -> Result<u64> {
    if booking_ids.is_empty() {
        return Err(Error::Validation(
            "Please provide an array of student booking ids".to_string(),
        ));
    }

    let sql = insert_pairs_sql(booking_ids.len());
    let mut query = sqlx::query(&sql);
    for booking_id in booking_ids {
        query = query.bind(opportunity_id).bind(booking_id);
    }
    let result = query
        .execute(pool)
        .await
        .map_err(|e| Error::from_sqlx(e, "Student already assigned to this opportunity"))?;

    Ok(result.rows_affected())
}

/// Replace an opportunity's assignments: delete everything, insert the new
/// list. Runs in one transaction so a failed insert cannot leave the
/// opportunity with no assignments at all.
pub async fn reassign_students(
    pool: &SqlitePool,
    opportunity_id: i64,
    booking_ids: &[String],
) -> Result<u64> {
    if booking_ids.is_empty() {
        return Err(Error::Validation(
            "Please provide an array of student booking ids".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM opportunity_students WHERE opportunity_id = ?")
        .bind(opportunity_id)
        .execute(&mut *tx)
        .await?;

    let sql = insert_pairs_sql(booking_ids.len());
    let mut query = sqlx::query(&sql);
    for booking_id in booking_ids {
        query = query.bind(opportunity_id).bind(booking_id);
    }
    let result = query.execute(&mut *tx).await?;

    tx.commit().await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn sample() -> OpportunityFields {
        OpportunityFields {
            company_name: "Initech".to_string(),
            drive_date: Some("2026-09-01".to_string()),
            drive_role: Some("Analyst".to_string()),
            package: Some(4.2),
            selected_batch: Some("FS01".to_string()),
            domain: Some("Full Stack".to_string()),
            created_domain: Some("fullstack".to_string()),
        }
    }

    #[tokio::test]
    async fn crud_roundtrip() {
        let pool = test_pool().await;
        let id = create(&pool, &sample()).await.unwrap();

        let opp = get(&pool, id).await.unwrap();
        assert_eq!(opp.company_name, "Initech");
        assert_eq!(opp.package, Some(4.2));

        let mut changed = sample();
        changed.drive_role = Some("Developer".to_string());
        update(&pool, id, &changed).await.unwrap();
        let opp = get(&pool, id).await.unwrap();
        assert_eq!(opp.drive_role.as_deref(), Some("Developer"));

        delete(&pool, id).await.unwrap();
        assert!(matches!(
            get(&pool, id).await.unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn reassign_replaces_all_junction_rows() {
        let pool = test_pool().await;
        let id = create(&pool, &sample()).await.unwrap();

        let first = vec!["BK1".to_string(), "BK2".to_string()];
        assert_eq!(assign_students(&pool, id, &first).await.unwrap(), 2);

        let second = vec!["BK3".to_string()];
        assert_eq!(reassign_students(&pool, id, &second).await.unwrap(), 1);

        let remaining: Vec<String> = sqlx::query_scalar(
            "SELECT student_booking_id FROM opportunity_students WHERE opportunity_id = ?",
        )
        .bind(id)
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(remaining, vec!["BK3".to_string()]);
    }

    #[tokio::test]
    async fn assignment_requires_student_list() {
        let pool = test_pool().await;
        let id = create(&pool, &sample()).await.unwrap();

        assert!(matches!(
            assign_students(&pool, id, &[]).await.unwrap_err(),
            Error::Validation(_)
        ));
        assert!(matches!(
            reassign_students(&pool, id, &[]).await.unwrap_err(),
            Error::Validation(_)
        ));
    }
}
