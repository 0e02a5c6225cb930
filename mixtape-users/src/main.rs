//! mixtape-users - Identity store service
//!
//! Owns the user accounts and answers the existence and credential
//! checks the rest of the suite gates its mutations on.

use anyhow::Result;
use clap::Parser;
use mixtape_common::config::{ServiceArgs, ServiceConfig, DEFAULT_USERS_PORT};
use mixtape_users::{build_router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Mixtape identity store (mixtape-users) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = ServiceArgs::parse();
    let config = ServiceConfig::load("users", DEFAULT_USERS_PORT, &args)?;

    let pool = mixtape_common::db::open_database(&config.database_path).await?;
    mixtape_users::db::init_schema(&pool).await?;

    let app = build_router(AppState::new(pool));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("mixtape-users listening on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
