//! Trainer and batch-trainer assignment repository
//!
//! Assignments accumulate per batch (no replace-on-conflict) and are
//! returned in insertion order. Times are submitted and displayed in
//! 12-hour form but stored as `HH:MM:SS`.

use placetrack_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Trainer {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Assignment {
    pub trainer_name: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignmentRequest {
    pub trainer_name: Option<String>,
    pub s_timing: Option<String>,
    pub e_timing: Option<String>,
}

/// Parse a 12-hour time like `9:00 AM` (H 1-12, MM 00-59) into the stored
/// 24-hour `HH:MM:SS` form. Returns None on any deviation from the format.
pub fn parse_time_12h(input: &str) -> Option<String> {
    let (time, meridiem) = input.split_once(' ')?;
    if meridiem != "AM" && meridiem != "PM" {
        return None;
    }

    let (hours_str, minutes_str) = time.split_once(':')?;
    // Hours carry no leading zero: "9:00 AM", never "09:00 AM"
    if hours_str.is_empty() || hours_str.len() > 2 || hours_str.starts_with('0') {
        return None;
    }
    if minutes_str.len() != 2 {
        return None;
    }
    if !hours_str.chars().all(|c| c.is_ascii_digit())
        || !minutes_str.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let hours: u32 = hours_str.parse().ok()?;
    let minutes: u32 = minutes_str.parse().ok()?;
    if !(1..=12).contains(&hours) || minutes > 59 {
        return None;
    }

    let hours_24 = match (meridiem, hours) {
        ("AM", 12) => 0,
        ("AM", h) => h,
        ("PM", 12) => 12,
        ("PM", h) => h + 12,
        _ => unreachable!(),
    };

    Some(format!("{:02}:{:02}:00", hours_24, minutes))
}

/// Render a stored `HH:MM[:SS]` time back in `9:00 AM` form.
pub fn format_time_12h(stored: &str) -> String {
    let mut parts = stored.split(':');
    let (Some(hours), Some(minutes)) = (parts.next(), parts.next()) else {
        return String::new();
    };
    let (Ok(hours), Ok(minutes)) = (hours.parse::<u32>(), minutes.parse::<u32>()) else {
        return String::new();
    };

    let meridiem = if hours >= 12 { "PM" } else { "AM" };
    let display_hours = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hours, minutes, meridiem)
}

/// Active trainers for the assignment dropdown, ordered by name.
pub async fn active_trainers(pool: &SqlitePool) -> Result<Vec<Trainer>> {
    Ok(
        sqlx::query_as::<_, Trainer>("SELECT id, name FROM trainers WHERE is_active = 1 ORDER BY name")
            .fetch_all(pool)
            .await?,
    )
}

async fn find_active_by_name(pool: &SqlitePool, name: &str) -> Result<Option<i64>> {
    Ok(
        sqlx::query_scalar("SELECT id FROM trainers WHERE name = ? AND is_active = 1")
            .bind(name)
            .fetch_optional(pool)
            .await?,
    )
}

/// Assignments for a batch in insertion order, with stored times.
pub async fn assignments_for_batch(pool: &SqlitePool, batch_no: &str) -> Result<Vec<Assignment>> {
    Ok(sqlx::query_as::<_, Assignment>(
        r#"
        SELECT t.name AS trainer_name, bt.start_time, bt.end_time
        FROM batch_trainers bt
        JOIN trainers t ON bt.trainer_id = t.id
        WHERE bt.batch_no = ?
        ORDER BY bt.assigned_at ASC, bt.id ASC
        "#,
    )
    .bind(batch_no)
    .fetch_all(pool)
    .await?)
}

/// Validate and append a trainer-timing assignment for a batch.
pub async fn add_assignment(
    pool: &SqlitePool,
    batch_no: &str,
    req: &AssignmentRequest,
) -> Result<()> {
    let (Some(trainer_name), Some(s_timing), Some(e_timing)) = (
        req.trainer_name.as_deref(),
        req.s_timing.as_deref(),
        req.e_timing.as_deref(),
    ) else {
        return Err(Error::Validation(
            "trainer_name, s_timing, and e_timing are required".to_string(),
        ));
    };

    let start_time = parse_time_12h(s_timing);
    let end_time = parse_time_12h(e_timing);
    let (Some(start_time), Some(end_time)) = (start_time, end_time) else {
        return Err(Error::Validation(
            "Time must be in format '9:00 AM'".to_string(),
        ));
    };

    // Textual comparison on the submitted strings, before normalization
    if s_timing == e_timing {
        return Err(Error::Validation(
            "Start and end time cannot be the same".to_string(),
        ));
    }

    let trainer_id = find_active_by_name(pool, trainer_name)
        .await?
        .ok_or_else(|| Error::NotFound("Trainer not found or inactive".to_string()))?;

    sqlx::query(
        "INSERT INTO batch_trainers (batch_no, trainer_id, start_time, end_time) VALUES (?, ?, ?, ?)",
    )
    .bind(batch_no)
    .bind(trainer_id)
    .bind(&start_time)
    .bind(&end_time)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[test]
    fn parses_valid_12h_times() {
        assert_eq!(parse_time_12h("9:00 AM").as_deref(), Some("09:00:00"));
        assert_eq!(parse_time_12h("12:00 AM").as_deref(), Some("00:00:00"));
        assert_eq!(parse_time_12h("12:30 PM").as_deref(), Some("12:30:00"));
        assert_eq!(parse_time_12h("11:59 PM").as_deref(), Some("23:59:00"));
        assert_eq!(parse_time_12h("1:05 PM").as_deref(), Some("13:05:00"));
    }

    #[test]
    fn rejects_malformed_times() {
        assert_eq!(parse_time_12h("13:00 PM"), None);
        assert_eq!(parse_time_12h("0:30 AM"), None);
        assert_eq!(parse_time_12h("9:60 AM"), None);
        assert_eq!(parse_time_12h("9:5 AM"), None);
        assert_eq!(parse_time_12h("9:00am"), None);
        assert_eq!(parse_time_12h("9:00"), None);
        assert_eq!(parse_time_12h("09:00 AM"), None);
        assert_eq!(parse_time_12h("9:00 am"), None);
    }

    #[test]
    fn formats_back_to_12h() {
        assert_eq!(format_time_12h("09:00:00"), "9:00 AM");
        assert_eq!(format_time_12h("00:15:00"), "12:15 AM");
        assert_eq!(format_time_12h("12:00:00"), "12:00 PM");
        assert_eq!(format_time_12h("23:59:00"), "11:59 PM");
    }

    async fn seed_trainer(pool: &SqlitePool, name: &str, active: bool) {
        sqlx::query("INSERT INTO trainers (name, is_active) VALUES (?, ?)")
            .bind(name)
            .bind(active as i64)
            .execute(pool)
            .await
            .unwrap();
    }

    fn request(trainer: &str, start: &str, end: &str) -> AssignmentRequest {
        AssignmentRequest {
            trainer_name: Some(trainer.to_string()),
            s_timing: Some(start.to_string()),
            e_timing: Some(end.to_string()),
        }
    }

    #[tokio::test]
    async fn assignments_accumulate_in_insertion_order() {
        let pool = test_pool().await;
        seed_trainer(&pool, "Asha", true).await;
        seed_trainer(&pool, "Vikram", true).await;

        add_assignment(&pool, "FS01", &request("Vikram", "9:00 AM", "11:00 AM"))
            .await
            .unwrap();
        add_assignment(&pool, "FS01", &request("Asha", "2:00 PM", "4:00 PM"))
            .await
            .unwrap();

        let rows = assignments_for_batch(&pool, "FS01").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].trainer_name, "Vikram");
        assert_eq!(rows[0].start_time, "09:00:00");
        assert_eq!(rows[1].trainer_name, "Asha");
        assert_eq!(rows[1].end_time, "16:00:00");
    }

    #[tokio::test]
    async fn identical_times_are_rejected_even_when_valid() {
        let pool = test_pool().await;
        seed_trainer(&pool, "Asha", true).await;

        let err = add_assignment(&pool, "FS01", &request("Asha", "9:00 AM", "9:00 AM"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn inactive_trainer_is_not_found() {
        let pool = test_pool().await;
        seed_trainer(&pool, "Asha", false).await;

        let err = add_assignment(&pool, "FS01", &request("Asha", "9:00 AM", "11:00 AM"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
