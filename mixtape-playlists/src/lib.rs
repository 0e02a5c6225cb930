//! mixtape-playlists library - Playlist service
//!
//! Owns playlists, their song membership, and sharing grants. Every
//! write first validates its preconditions against the owning peer
//! service (identity, song catalogue), then mutates locally, then
//! notifies the activity ledger best-effort.

use axum::Router;
use mixtape_common::clients::{ActivityLogClient, SongCatalogClient, UserDirectoryClient};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Private playlist database
    pub db: SqlitePool,
    /// Existence checks against the identity store
    pub users: UserDirectoryClient,
    /// Existence checks against the external song catalogue
    pub catalog: SongCatalogClient,
    /// Post-commit notifications to the activity ledger
    pub activities: ActivityLogClient,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        users: UserDirectoryClient,
        catalog: SongCatalogClient,
        activities: ActivityLogClient,
    ) -> Self {
        Self {
            db,
            users,
            catalog,
            activities,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/playlists", get(api::list_playlists).post(api::create_playlist))
        .route("/playlists/shared", get(api::shared_playlists))
        .route("/playlists/:id", get(api::playlist_songs).post(api::add_song))
        .route("/playlists/:id/shares", post(api::share_playlist))
        .route("/health", get(api::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
