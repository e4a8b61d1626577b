//! # PlaceTrack Common Library
//!
//! Shared code for the PlaceTrack back office:
//! - Error taxonomy
//! - Configuration loading
//! - Database initialization (schema + pool)
//! - Domain name normalization

pub mod config;
pub mod db;
pub mod domain;
pub mod error;

pub use error::{Error, Result};
