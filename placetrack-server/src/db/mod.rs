//! Entity repositories
//!
//! One module per table (or family of lookup tables). Each function takes
//! the pool explicitly; there is no global handle.

pub mod batches;
pub mod lookups;
pub mod opportunities;
pub mod reports;
pub mod scores;
pub mod spocs;
pub mod stats;
pub mod students;
pub mod team_leaders;
pub mod trainers;
pub mod users;

#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    // One connection: each :memory: connection is its own database
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    placetrack_common::db::create_schema(&pool)
        .await
        .expect("Failed to create schema");
    pool
}
