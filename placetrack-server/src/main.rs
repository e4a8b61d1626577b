//! placetrack-server: placement-tracking back office
//!
//! CRUD REST endpoints over the placement schema (batches, students,
//! opportunities, scores, team leaders, SPOCs, lookup tables) plus the
//! dashboard aggregation endpoints.

use anyhow::Result;
use clap::Parser;
use placetrack_common::config::Config;
use placetrack_common::db::init_database;
use placetrack_server::{build_router, AppState};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "placetrack-server", about = "Placement tracking back office")]
struct Args {
    /// Database file path
    #[arg(long, env = "PLACETRACK_DB")]
    database: Option<String>,

    /// Bind address (host:port)
    #[arg(long, env = "PLACETRACK_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting placetrack-server v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = Config::load(args.database.as_deref(), args.bind.as_deref())?;
    info!("Database path: {}", config.database_path.display());

    let pool = init_database(
        &config.database_path,
        config.pool_max_connections,
        config.pool_acquire_timeout_ms,
    )
    .await?;
    info!("Database connected");

    let state = AppState::new(pool, config.bcrypt_cost);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("placetrack-server listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
