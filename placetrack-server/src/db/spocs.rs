//! SPOC repository
//!
//! Company single-point-of-contact records. All five fields are required
//! on create; update is a full-row write.

use placetrack_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Spoc {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SpocFields {
    pub name: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

fn require_all(fields: &SpocFields) -> Result<(&str, &str, &str, &str, &str)> {
    match (
        fields.name.as_deref(),
        fields.company.as_deref(),
        fields.address.as_deref(),
        fields.email.as_deref(),
        fields.phone.as_deref(),
    ) {
        (Some(name), Some(company), Some(address), Some(email), Some(phone))
            if ![name, company, address, email, phone]
                .iter()
                .any(|v| v.is_empty()) =>
        {
            Ok((name, company, address, email, phone))
        }
        _ => Err(Error::Validation("All fields are required".to_string())),
    }
}

pub async fn create(pool: &SqlitePool, fields: &SpocFields) -> Result<i64> {
    let (name, company, address, email, phone) = require_all(fields)?;

    let result = sqlx::query(
        "INSERT INTO spocs (name, company, address, email, phone) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(name)
    .bind(company)
    .bind(address)
    .bind(email)
    .bind(phone)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Spoc>> {
    Ok(sqlx::query_as::<_, Spoc>("SELECT * FROM spocs")
        .fetch_all(pool)
        .await?)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Spoc> {
    sqlx::query_as::<_, Spoc>("SELECT * FROM spocs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound("SPOC not found".to_string()))
}

pub async fn update(pool: &SqlitePool, id: i64, fields: &SpocFields) -> Result<()> {
    let result = sqlx::query(
        "UPDATE spocs SET name = ?, company = ?, address = ?, email = ?, phone = ? WHERE id = ?",
    )
    .bind(&fields.name)
    .bind(&fields.company)
    .bind(&fields.address)
    .bind(&fields.email)
    .bind(&fields.phone)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("SPOC not found".to_string()));
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM spocs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("SPOC not found".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn sample() -> SpocFields {
        SpocFields {
            name: Some("Kiran".to_string()),
            company: Some("Initech".to_string()),
            address: Some("Bengaluru".to_string()),
            email: Some("kiran@initech.com".to_string()),
            phone: Some("9876501234".to_string()),
        }
    }

    #[tokio::test]
    async fn create_requires_every_field() {
        let pool = test_pool().await;
        let mut missing = sample();
        missing.address = None;
        assert!(matches!(
            create(&pool, &missing).await.unwrap_err(),
            Error::Validation(_)
        ));

        let id = create(&pool, &sample()).await.unwrap();
        let spoc = get(&pool, id).await.unwrap();
        assert_eq!(spoc.company, "Initech");
    }

    #[tokio::test]
    async fn update_and_delete_report_not_found() {
        let pool = test_pool().await;
        assert!(matches!(
            update(&pool, 42, &sample()).await.unwrap_err(),
            Error::NotFound(_)
        ));
        assert!(matches!(
            delete(&pool, 42).await.unwrap_err(),
            Error::NotFound(_)
        ));
    }
}
