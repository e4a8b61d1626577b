//! Lookup/reference tables
//!
//! Two shapes cover all of them: key+label tables (user types, domains,
//! EPIC statuses) and label-only tables (eligibility statuses, batch
//! statuses, placements). Each table keeps its own per-endpoint policies
//! in the handlers; this module only carries the shared SQL.

use placetrack_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Row of a key+label lookup table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct KeyLabelRow {
    pub id: i64,
    pub key: String,
    pub label: String,
}

/// Row of a label-only lookup table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LabelRow {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct KeyLabelFields {
    pub key: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LabelFields {
    pub label: Option<String>,
}

/// A key+label lookup table. `entity` names the table in error messages.
#[derive(Debug, Clone, Copy)]
pub struct KeyLabelTable {
    pub table: &'static str,
    pub entity: &'static str,
}

pub const USER_TYPES: KeyLabelTable = KeyLabelTable {
    table: "user_types",
    entity: "User Type",
};
pub const DOMAINS: KeyLabelTable = KeyLabelTable {
    table: "domains",
    entity: "Domain",
};
pub const EPIC: KeyLabelTable = KeyLabelTable {
    table: "epic",
    entity: "EPIC",
};

impl KeyLabelTable {
    fn not_found(&self) -> Error {
        Error::NotFound(format!("{} not found", self.entity))
    }

    pub async fn create(&self, pool: &SqlitePool, fields: &KeyLabelFields) -> Result<i64> {
        let (key, label) = match (fields.key.as_deref(), fields.label.as_deref()) {
            (Some(key), Some(label)) if !key.is_empty() && !label.is_empty() => (key, label),
            _ => {
                return Err(Error::Validation(
                    "Both key and label are required".to_string(),
                ))
            }
        };

        let sql = format!("INSERT INTO {} (key, label) VALUES (?, ?)", self.table);
        let result = sqlx::query(&sql).bind(key).bind(label).execute(pool).await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn list_all(&self, pool: &SqlitePool) -> Result<Vec<KeyLabelRow>> {
        let sql = format!("SELECT * FROM {}", self.table);
        Ok(sqlx::query_as::<_, KeyLabelRow>(&sql).fetch_all(pool).await?)
    }

    pub async fn get(&self, pool: &SqlitePool, id: i64) -> Result<KeyLabelRow> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", self.table);
        sqlx::query_as::<_, KeyLabelRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| self.not_found())
    }

    pub async fn update(&self, pool: &SqlitePool, id: i64, fields: &KeyLabelFields) -> Result<()> {
        let sql = format!("UPDATE {} SET key = ?, label = ? WHERE id = ?", self.table);
        let result = sqlx::query(&sql)
            .bind(&fields.key)
            .bind(&fields.label)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(self.not_found());
        }
        Ok(())
    }
}

/// A label-only lookup table.
#[derive(Debug, Clone, Copy)]
pub struct LabelTable {
    pub table: &'static str,
    pub entity: &'static str,
}

pub const ELIGIBILITY_STATUS: LabelTable = LabelTable {
    table: "eligibility_status",
    entity: "Status",
};
pub const BATCH_STATUS: LabelTable = LabelTable {
    table: "batch_status",
    entity: "Batch status",
};
pub const PLACEMENTS: LabelTable = LabelTable {
    table: "placements",
    entity: "Placement",
};

impl LabelTable {
    fn not_found(&self) -> Error {
        Error::NotFound(format!("{} not found", self.entity))
    }

    pub async fn insert(&self, pool: &SqlitePool, label: &str) -> Result<i64> {
        let sql = format!("INSERT INTO {} (label) VALUES (?)", self.table);
        let result = sqlx::query(&sql).bind(label).execute(pool).await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn list_by_id(&self, pool: &SqlitePool) -> Result<Vec<LabelRow>> {
        let sql = format!("SELECT * FROM {} ORDER BY id ASC", self.table);
        Ok(sqlx::query_as::<_, LabelRow>(&sql).fetch_all(pool).await?)
    }

    pub async fn list_newest_first(&self, pool: &SqlitePool) -> Result<Vec<LabelRow>> {
        let sql = format!("SELECT * FROM {} ORDER BY created_at DESC", self.table);
        Ok(sqlx::query_as::<_, LabelRow>(&sql).fetch_all(pool).await?)
    }

    pub async fn get(&self, pool: &SqlitePool, id: i64) -> Result<LabelRow> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", self.table);
        sqlx::query_as::<_, LabelRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| self.not_found())
    }

    /// Update the label, returning the number of affected rows. Whether a
    /// zero count is an error is decided per endpoint.
    pub async fn update(&self, pool: &SqlitePool, id: i64, label: &str) -> Result<u64> {
        let sql = format!("UPDATE {} SET label = ? WHERE id = ?", self.table);
        let result = sqlx::query(&sql).bind(label).bind(id).execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Delete a row, returning the affected count; same per-endpoint rule.
    pub async fn delete(&self, pool: &SqlitePool, id: i64) -> Result<u64> {
        let sql = format!("DELETE FROM {} WHERE id = ?", self.table);
        let result = sqlx::query(&sql).bind(id).execute(pool).await?;
        Ok(result.rows_affected())
    }
}

/// Require a label to be present and non-empty, returned as-is.
pub fn require_label(fields: &LabelFields) -> Result<&str> {
    match fields.label.as_deref() {
        Some(label) if !label.is_empty() => Ok(label),
        _ => Err(Error::Validation("Label is required".to_string())),
    }
}

/// Require a non-blank label after trimming; the placements surface trims
/// before storing.
pub fn require_label_trimmed(fields: &LabelFields) -> Result<&str> {
    match fields.label.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => Ok(label),
        _ => Err(Error::Validation("Label is required".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn key_label_tables_are_independent() {
        let pool = test_pool().await;
        let domain_id = DOMAINS
            .create(
                &pool,
                &KeyLabelFields {
                    key: Some("fullstack".to_string()),
                    label: Some("Full Stack Development".to_string()),
                },
            )
            .await
            .unwrap();
        EPIC.create(
            &pool,
            &KeyLabelFields {
                key: Some("excellent".to_string()),
                label: Some("Excellent".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(DOMAINS.list_all(&pool).await.unwrap().len(), 1);
        assert_eq!(USER_TYPES.list_all(&pool).await.unwrap().len(), 0);

        let row = DOMAINS.get(&pool, domain_id).await.unwrap();
        assert_eq!(row.key, "fullstack");

        assert!(matches!(
            EPIC.get(&pool, 999).await.unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn key_label_create_requires_both_fields() {
        let pool = test_pool().await;
        let err = DOMAINS
            .create(
                &pool,
                &KeyLabelFields {
                    key: Some("x".to_string()),
                    label: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn label_table_update_reports_affected_count() {
        let pool = test_pool().await;
        let id = BATCH_STATUS.insert(&pool, "Ongoing").await.unwrap();

        assert_eq!(BATCH_STATUS.update(&pool, id, "Completed").await.unwrap(), 1);
        assert_eq!(BATCH_STATUS.update(&pool, 999, "x").await.unwrap(), 0);

        assert_eq!(BATCH_STATUS.delete(&pool, id).await.unwrap(), 1);
        assert_eq!(BATCH_STATUS.delete(&pool, id).await.unwrap(), 0);
    }

    #[test]
    fn labels_must_not_be_blank() {
        assert!(require_label(&LabelFields {
            label: Some("  ".to_string())
        })
        .is_err());
        assert!(require_label(&LabelFields { label: None }).is_err());
        assert!(require_label(&LabelFields {
            label: Some("Eligible".to_string())
        })
        .is_ok());
    }
}
