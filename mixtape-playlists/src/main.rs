//! mixtape-playlists - Playlist service

use anyhow::Result;
use clap::Parser;
use mixtape_common::clients::{ActivityLogClient, SongCatalogClient, UserDirectoryClient};
use mixtape_common::config::{ServiceArgs, ServiceConfig, DEFAULT_PLAYLISTS_PORT};
use mixtape_playlists::{build_router, AppState};
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
        "Starting Mixtape playlist service (mixtape-playlists) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = ServiceArgs::parse();
    let config = ServiceConfig::load("playlists", DEFAULT_PLAYLISTS_PORT, &args)?;

    let pool = mixtape_common::db::open_database(&config.database_path).await?;
    mixtape_playlists::db::init_schema(&pool).await?;

    let users = UserDirectoryClient::new(&config.peers.users)?;
    let catalog = SongCatalogClient::new(&config.peers.songs)?;
    let activities = ActivityLogClient::new(&config.peers.activities)?;
    let app = build_router(AppState::new(pool, users, catalog, activities));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(
        "mixtape-playlists listening on http://0.0.0.0:{}",
        config.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
