//! Team Leader repository
//!
//! The only entity with field-level validation: the dashboard shows the
//! per-field error map directly on the form. Email uniqueness is checked
//! before the write so the message stays stable.

use placetrack_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use uuid::Uuid;

pub const DEFAULT_ROLE: &str = "Placement TL";
pub const DEFAULT_PASSWORD: &str = "welcome123";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TeamLeader {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TeamLeaderFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

fn valid_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let Some(domain) = parts.next() else {
        return false;
    };
    if local.is_empty() || local.contains(char::is_whitespace) {
        return false;
    }
    let mut domain_parts = domain.rsplitn(2, '.');
    let tld = domain_parts.next().unwrap_or("");
    let Some(host) = domain_parts.next() else {
        return false;
    };
    !host.is_empty()
        && !tld.is_empty()
        && !domain.contains(char::is_whitespace)
        && !domain.contains('@')
}

fn valid_phone(phone: &str) -> bool {
    phone.len() == 10
        && phone.chars().all(|c| c.is_ascii_digit())
        && matches!(phone.chars().next(), Some('6'..='9'))
}

/// Validate the given fields; `required` lists the fields that must be
/// present and non-blank. Returns the per-field error map on failure.
fn validate(fields: &TeamLeaderFields, required: &[&str]) -> Result<()> {
    let mut errors: BTreeMap<String, String> = BTreeMap::new();

    for &field in required {
        let value = match field {
            "name" => &fields.name,
            "email" => &fields.email,
            "phone" => &fields.phone,
            _ => continue,
        };
        if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
            let mut label = field.to_string();
            label[..1].make_ascii_uppercase();
            errors.insert(field.to_string(), format!("{} is required", label));
        }
    }

    if let Some(email) = fields.email.as_deref() {
        if !email.trim().is_empty() && !valid_email(email.trim()) {
            errors.insert("email".to_string(), "Invalid email format".to_string());
        }
    }

    if let Some(phone) = fields.phone.as_deref() {
        if !phone.trim().is_empty() && !valid_phone(phone.trim()) {
            errors.insert(
                "phone".to_string(),
                "Phone must be 10 digits and start with 6-9".to_string(),
            );
        }
    }

    if let Some(password) = fields.password.as_deref() {
        if !password.trim().is_empty() && password.len() < 6 {
            errors.insert(
                "password".to_string(),
                "Password must be at least 6 characters".to_string(),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::FieldValidation(errors))
    }
}

pub async fn create(pool: &SqlitePool, fields: &TeamLeaderFields) -> Result<TeamLeader> {
    validate(fields, &["name", "email", "phone"])?;

    // validate() guarantees the required fields are present
    let (Some(name), Some(email), Some(phone)) = (
        fields.name.as_deref(),
        fields.email.as_deref(),
        fields.phone.as_deref(),
    ) else {
        return Err(Error::Validation("name, email and phone are required".to_string()));
    };

    let email = email.trim().to_string();
    let existing: Option<String> =
        sqlx::query_scalar("SELECT id FROM team_leaders WHERE email = ?")
            .bind(&email)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        return Err(Error::Conflict("Email already exists".to_string()));
    }

    let id = Uuid::new_v4().to_string();
    let name = name.trim().to_string();
    let phone = phone.trim().to_string();
    let role = fields.role.clone().unwrap_or_else(|| DEFAULT_ROLE.to_string());
    let password = fields
        .password
        .clone()
        .unwrap_or_else(|| DEFAULT_PASSWORD.to_string());

    sqlx::query(
        "INSERT INTO team_leaders (id, name, email, phone, role, password) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&name)
    .bind(&email)
    .bind(&phone)
    .bind(&role)
    .bind(&password)
    .execute(pool)
    .await
    .map_err(|e| Error::from_sqlx(e, "Email already exists"))?;

    get(pool, &id).await
}

/// All team leaders, newest first.
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<TeamLeader>> {
    Ok(
        sqlx::query_as::<_, TeamLeader>("SELECT * FROM team_leaders ORDER BY created_at DESC, id DESC")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<TeamLeader> {
    sqlx::query_as::<_, TeamLeader>("SELECT * FROM team_leaders WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound("Team Leader not found".to_string()))
}

/// Partial update; provided fields are validated and written, a blank
/// password is ignored rather than stored.
pub async fn update(pool: &SqlitePool, id: &str, fields: &TeamLeaderFields) -> Result<TeamLeader> {
    let existing = get(pool, id).await?;

    let mut required: Vec<&str> = Vec::new();
    if fields.name.is_some() {
        required.push("name");
    }
    if fields.email.is_some() {
        required.push("email");
    }
    if fields.phone.is_some() {
        required.push("phone");
    }
    validate(fields, &required)?;

    if let Some(email) = fields.email.as_deref() {
        if email != existing.email {
            let taken: Option<String> =
                sqlx::query_scalar("SELECT id FROM team_leaders WHERE email = ? AND id != ?")
                    .bind(email)
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
            if taken.is_some() {
                return Err(Error::Conflict("Email already exists".to_string()));
            }
        }
    }

    let mut sets: Vec<&'static str> = Vec::new();
    let mut values: Vec<String> = Vec::new();

    if let Some(name) = &fields.name {
        sets.push("name = ?");
        values.push(name.trim().to_string());
    }
    if let Some(email) = &fields.email {
        sets.push("email = ?");
        values.push(email.trim().to_string());
    }
    if let Some(phone) = &fields.phone {
        sets.push("phone = ?");
        values.push(phone.trim().to_string());
    }
    if let Some(role) = &fields.role {
        sets.push("role = ?");
        values.push(role.clone());
    }
    if let Some(password) = &fields.password {
        if !password.trim().is_empty() {
            sets.push("password = ?");
            values.push(password.clone());
        }
    }

    if sets.is_empty() {
        return Err(Error::Validation("No fields to update".to_string()));
    }

    let sql = format!("UPDATE team_leaders SET {} WHERE id = ?", sets.join(", "));
    let mut query = sqlx::query(&sql);
    for value in &values {
        query = query.bind(value);
    }
    query
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| Error::from_sqlx(e, "Email already exists"))?;

    get(pool, id).await
}

/// Delete a team leader, returning the deleted record's name.
pub async fn delete(pool: &SqlitePool, id: &str) -> Result<String> {
    let name: Option<String> = sqlx::query_scalar("SELECT name FROM team_leaders WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let name = name.ok_or_else(|| Error::NotFound("Team Leader not found".to_string()))?;

    sqlx::query("DELETE FROM team_leaders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(name)
}
