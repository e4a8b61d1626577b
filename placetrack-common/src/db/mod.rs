//! Database access layer
//!
//! Pool construction and idempotent schema creation. Entity repositories
//! live in the server crate; this module only owns the shared schema.

pub mod init;

pub use init::{create_schema, init_database};
