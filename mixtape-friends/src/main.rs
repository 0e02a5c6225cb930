//! mixtape-friends - Friendship graph service

use anyhow::Result;
use clap::Parser;
use mixtape_common::clients::UserDirectoryClient;
use mixtape_common::config::{ServiceArgs, ServiceConfig, DEFAULT_FRIENDS_PORT};
use mixtape_friends::{build_router, AppState};
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
        "Starting Mixtape friendship graph (mixtape-friends) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = ServiceArgs::parse();
    let config = ServiceConfig::load("friends", DEFAULT_FRIENDS_PORT, &args)?;

    let pool = mixtape_common::db::open_database(&config.database_path).await?;
    mixtape_friends::db::init_schema(&pool).await?;

    let users = UserDirectoryClient::new(&config.peers.users)?;
    let app = build_router(AppState::new(pool, users));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(
        "mixtape-friends listening on http://0.0.0.0:{}",
        config.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
