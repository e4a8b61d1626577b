//! Configuration loading
//!
//! Resolution priority for every setting:
//! 1. Command-line argument (highest)
//! 2. Environment variable (`PLACETRACK_*`)
//! 3. TOML config file
//! 4. Compiled default

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

/// Process configuration for the PlaceTrack server.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file path
    pub database_path: PathBuf,
    /// HTTP bind address (host:port)
    pub bind_addr: String,
    /// Maximum concurrent pool connections
    pub pool_max_connections: u32,
    /// How long an acquire waits for a free connection before failing fast
    pub pool_acquire_timeout_ms: u64,
    /// bcrypt cost factor for user password hashing
    pub bcrypt_cost: u32,
}

/// Optional keys as they appear in the TOML config file.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub database_path: Option<String>,
    pub bind_addr: Option<String>,
    pub pool_max_connections: Option<u32>,
    pub pool_acquire_timeout_ms: Option<u64>,
    pub bcrypt_cost: Option<u32>,
}

impl Config {
    /// Resolve the full configuration from CLI overrides, environment,
    /// config file, and defaults, in that order.
    pub fn load(cli_database: Option<&str>, cli_bind: Option<&str>) -> Result<Config> {
        let file = load_config_file()?;

        let database_path = cli_database
            .map(PathBuf::from)
            .or_else(|| std::env::var("PLACETRACK_DB").ok().map(PathBuf::from))
            .or_else(|| file.database_path.as_ref().map(PathBuf::from))
            .unwrap_or_else(default_database_path);

        let bind_addr = cli_bind
            .map(str::to_string)
            .or_else(|| std::env::var("PLACETRACK_BIND").ok())
            .or_else(|| file.bind_addr.clone())
            .unwrap_or_else(|| "127.0.0.1:5000".to_string());

        let pool_max_connections = env_parse("PLACETRACK_MAX_CONNECTIONS")?
            .or(file.pool_max_connections)
            .unwrap_or(10);

        let pool_acquire_timeout_ms = env_parse("PLACETRACK_ACQUIRE_TIMEOUT_MS")?
            .or(file.pool_acquire_timeout_ms)
            .unwrap_or(5000);

        let bcrypt_cost = env_parse("PLACETRACK_BCRYPT_COST")?
            .or(file.bcrypt_cost)
            .unwrap_or(10);

        Ok(Config {
            database_path,
            bind_addr,
            pool_max_connections,
            pool_acquire_timeout_ms,
            bcrypt_cost,
        })
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("Invalid value for {}: {}", name, raw))),
        Err(_) => Ok(None),
    }
}

/// Read the TOML config file if one exists; an absent file is not an error.
fn load_config_file() -> Result<FileConfig> {
    let Some(path) = config_file_path() else {
        return Ok(FileConfig::default());
    };
    if !path.exists() {
        return Ok(FileConfig::default());
    }

    let raw = std::fs::read_to_string(&path)?;
    let parsed: FileConfig = toml::from_str(&raw)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
    info!("Loaded config file: {}", path.display());
    Ok(parsed)
}

/// Config file location: `PLACETRACK_CONFIG`, then the per-user config
/// directory, then `/etc/placetrack/config.toml` on Linux.
fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("PLACETRACK_CONFIG") {
        return Some(PathBuf::from(path));
    }

    if let Some(user_config) = dirs::config_dir().map(|d| d.join("placetrack").join("config.toml"))
    {
        if user_config.exists() {
            return Some(user_config);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/placetrack/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default database location.
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("placetrack").join("placetrack.db"))
        .unwrap_or_else(|| PathBuf::from("./placetrack.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_config_parses_partial_toml() {
        let parsed: FileConfig = toml::from_str(
            r#"
            bind_addr = "0.0.0.0:8080"
            pool_max_connections = 25
            "#,
        )
        .unwrap();
        assert_eq!(parsed.bind_addr.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(parsed.pool_max_connections, Some(25));
        assert_eq!(parsed.database_path, None);
        assert_eq!(parsed.bcrypt_cost, None);
    }

    #[test]
    fn file_config_rejects_wrong_types() {
        let parsed = toml::from_str::<FileConfig>("pool_max_connections = \"many\"");
        assert!(parsed.is_err());
    }
}
