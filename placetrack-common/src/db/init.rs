//! Database initialization
//!
//! Creates the database file on first run and applies the schema
//! idempotently. The pool is the only backpressure mechanism in the
//! system: `max_connections` bounds concurrency and `acquire_timeout`
//! makes saturated acquires fail fast instead of queuing forever.

use crate::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Open (creating if needed) the database at `db_path` and ensure the
/// schema exists.
pub async fn init_database(
    db_path: &Path,
    max_connections: u32,
    acquire_timeout_ms: u64,
) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_millis(acquire_timeout_ms))
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers while one request writes
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes if they do not exist.
///
/// Also used directly by tests running against in-memory databases.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_batches_table(pool).await?;
    create_students_table(pool).await?;
    create_opportunities_table(pool).await?;
    create_opportunity_students_table(pool).await?;
    create_scores_table(pool).await?;
    create_batch_changes_table(pool).await?;
    create_team_leaders_table(pool).await?;
    create_spocs_table(pool).await?;
    create_users_table(pool).await?;

    // Lookup/reference tables
    create_user_types_table(pool).await?;
    create_domains_table(pool).await?;
    create_epic_table(pool).await?;
    create_eligibility_status_table(pool).await?;
    create_batch_status_table(pool).await?;
    create_placements_table(pool).await?;

    // Trainer assignment tables
    create_trainers_table(pool).await?;
    create_batch_trainers_table(pool).await?;

    Ok(())
}

async fn create_batches_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS batches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            batch_no TEXT NOT NULL UNIQUE,
            batch_name TEXT,
            status TEXT,
            mode TEXT,
            start_date TEXT,
            end_date TEXT,
            domain TEXT,
            sections TEXT,
            trainer_name TEXT,
            total_count INTEGER,
            start_time TEXT,
            end_time TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_batches_domain ON batches(domain)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_students_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            batch_id INTEGER,
            batch_no TEXT,
            batch_name TEXT,
            booking_id TEXT NOT NULL UNIQUE,
            name TEXT,
            email TEXT,
            phone TEXT,
            alternate_phone TEXT,
            mode TEXT,
            gender TEXT,
            dob TEXT,
            address TEXT,
            pincode TEXT,
            city TEXT,
            state TEXT,
            photo_url TEXT,
            cv_url TEXT,
            tenth_percentage REAL,
            tenth_year INTEGER,
            twelfth_percentage REAL,
            twelfth_year INTEGER,
            ug TEXT,
            ug_percentage REAL,
            ug_mode TEXT,
            ug_specialization TEXT,
            ug_year INTEGER,
            ug_certificate_available INTEGER NOT NULL DEFAULT 0,
            ug_arrears_pending TEXT,
            pg TEXT,
            pg_percentage REAL,
            pg_specialization TEXT,
            pg_year INTEGER,
            pg_certificate_available INTEGER NOT NULL DEFAULT 0,
            pg_arrears_pending TEXT,
            gap_in_education TEXT,
            gap_reason TEXT,
            work_experience_years INTEGER,
            work_experience_months INTEGER,
            previous_organisation TEXT,
            experience TEXT,
            willing_to_relocate INTEGER NOT NULL DEFAULT 0,
            languages_write TEXT,
            languages_read TEXT,
            languages_speak TEXT,
            certificate_received TEXT NOT NULL DEFAULT 'N',
            epic_status TEXT NOT NULL DEFAULT '',
            placement TEXT NOT NULL DEFAULT '',
            status TEXT,
            domain TEXT,
            trainer_name TEXT,
            company TEXT,
            designation TEXT,
            salary REAL,
            placed_month TEXT,
            domain_score REAL,
            aptitude_score REAL,
            communication_score REAL,
            attendance REAL,
            mile1 REAL,
            mile2 REAL,
            mile3 REAL,
            irc REAL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_students_batch_no ON students(batch_no)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_students_batch_id ON students(batch_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_students_placement ON students(placement)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_opportunities_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS opportunities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            company_name TEXT NOT NULL,
            drive_date TEXT,
            drive_role TEXT,
            package REAL,
            selected_batch TEXT,
            domain TEXT,
            created_domain TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_opportunity_students_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS opportunity_students (
            opportunity_id INTEGER NOT NULL,
            student_booking_id TEXT NOT NULL,
            PRIMARY KEY (opportunity_id, student_booking_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_opportunity_students_opportunity ON opportunity_students(opportunity_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_scores_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scores (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            booking_id TEXT NOT NULL UNIQUE,
            mile1 REAL,
            mile2 REAL,
            mile3 REAL,
            irc REAL,
            epic_status TEXT,
            attendance REAL,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Append-only audit trail of student batch transfers.
async fn create_batch_changes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS batch_changes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            booking_id TEXT NOT NULL,
            from_batch TEXT,
            to_batch TEXT,
            domain TEXT,
            reason TEXT,
            attachment_url TEXT,
            requested_by TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_batch_changes_booking ON batch_changes(booking_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_team_leaders_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS team_leaders (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'Placement TL',
            password TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_spocs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS spocs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            company TEXT NOT NULL,
            address TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT NOT NULL,
            role TEXT NOT NULL,
            password TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_user_types_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_types (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL,
            label TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_domains_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS domains (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL,
            label TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_epic_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS epic (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL,
            label TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_eligibility_status_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS eligibility_status (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            label TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_batch_status_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS batch_status (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            label TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_placements_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS placements (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            label TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_trainers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS trainers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_batch_trainers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS batch_trainers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            batch_no TEXT NOT NULL,
            trainer_id INTEGER NOT NULL REFERENCES trainers(id),
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            assigned_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_batch_trainers_batch ON batch_trainers(batch_no)")
        .execute(pool)
        .await?;

    Ok(())
}
