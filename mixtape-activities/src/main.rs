//! mixtape-activities - Activity ledger service

use anyhow::Result;
use clap::Parser;
use mixtape_activities::{build_router, AppState};
use mixtape_common::clients::FriendGraphClient;
use mixtape_common::config::{ServiceArgs, ServiceConfig, DEFAULT_ACTIVITIES_PORT};
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
        "Starting Mixtape activity ledger (mixtape-activities) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = ServiceArgs::parse();
    let config = ServiceConfig::load("activities", DEFAULT_ACTIVITIES_PORT, &args)?;

    let pool = mixtape_common::db::open_database(&config.database_path).await?;
    mixtape_activities::db::init_schema(&pool).await?;

    let friends = FriendGraphClient::new(&config.peers.friends)?;
    let app = build_router(AppState::new(pool, friends));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(
        "mixtape-activities listening on http://0.0.0.0:{}",
        config.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
