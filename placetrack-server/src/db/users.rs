//! User repository
//!
//! Dashboard login accounts. New users always start with the fixed default
//! password, hashed with bcrypt. The hash never leaves the database; every
//! read uses the no-password projection.

use placetrack_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

pub const DEFAULT_PASSWORD: &str = "Welcome@123";

/// User row without the password column.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}

const USER_COLUMNS: &str = "id, name, email, phone, role, created_at, updated_at";

fn require_all(fields: &UserFields) -> Result<(&str, &str, &str, &str)> {
    match (
        fields.name.as_deref(),
        fields.email.as_deref(),
        fields.phone.as_deref(),
        fields.role.as_deref(),
    ) {
        (Some(name), Some(email), Some(phone), Some(role))
            if ![name, email, phone, role].iter().any(|v| v.is_empty()) =>
        {
            Ok((name, email, phone, role))
        }
        _ => Err(Error::Validation("All fields are required".to_string())),
    }
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let sql = format!("SELECT {} FROM users ORDER BY id ASC", USER_COLUMNS);
    Ok(sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<User> {
    let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
    sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))
}

/// Create a user with the default password hashed at the given cost.
pub async fn create(pool: &SqlitePool, fields: &UserFields, bcrypt_cost: u32) -> Result<User> {
    let (name, email, phone, role) = require_all(fields)?;

    let hashed = bcrypt::hash(DEFAULT_PASSWORD, bcrypt_cost)
        .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?;

    let result = sqlx::query(
        "INSERT INTO users (name, email, phone, role, password) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(role)
    .bind(&hashed)
    .execute(pool)
    .await
    .map_err(|e| Error::from_sqlx(e, "Email already exists"))?;

    get(pool, result.last_insert_rowid()).await
}

pub async fn update(pool: &SqlitePool, id: i64, fields: &UserFields) -> Result<User> {
    let (name, email, phone, role) = require_all(fields)?;

    sqlx::query(
        "UPDATE users SET name = ?, email = ?, phone = ?, role = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(role)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| Error::from_sqlx(e, "Email already exists"))?;

    get(pool, id).await
}

/// Delete never reports a missing row; the dashboard treats it as
/// idempotent.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn sample() -> UserFields {
        UserFields {
            name: Some("Anil".to_string()),
            email: Some("anil@example.com".to_string()),
            phone: Some("9876512340".to_string()),
            role: Some("spoc".to_string()),
        }
    }

    #[tokio::test]
    async fn create_hashes_default_password() {
        let pool = test_pool().await;
        // Minimum cost keeps the test fast
        let user = create(&pool, &sample(), 4).await.unwrap();
        assert_eq!(user.email, "anil@example.com");

        let stored: String = sqlx::query_scalar("SELECT password FROM users WHERE id = ?")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_ne!(stored, DEFAULT_PASSWORD);
        assert!(bcrypt::verify(DEFAULT_PASSWORD, &stored).unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let pool = test_pool().await;
        create(&pool, &sample(), 4).await.unwrap();
        let err = create(&pool, &sample(), 4).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn update_requires_all_fields_and_delete_is_idempotent() {
        let pool = test_pool().await;
        let user = create(&pool, &sample(), 4).await.unwrap();

        let mut partial = sample();
        partial.role = None;
        assert!(matches!(
            update(&pool, user.id, &partial).await.unwrap_err(),
            Error::Validation(_)
        ));

        let mut changed = sample();
        changed.name = Some("Anil Kumar".to_string());
        let updated = update(&pool, user.id, &changed).await.unwrap();
        assert_eq!(updated.name, "Anil Kumar");

        delete(&pool, user.id).await.unwrap();
        delete(&pool, user.id).await.unwrap();
    }
}
