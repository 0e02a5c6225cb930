//! mixtape-friends library - Friendship graph service
//!
//! Owns the friendship relation: one directed row per unordered pair,
//! resolved symmetrically on reads. Gates every mutation on identity
//! existence checks against the users service.

use axum::Router;
use mixtape_common::clients::UserDirectoryClient;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Private friendship database
    pub db: SqlitePool,
    /// Existence checks against the identity store
    pub users: UserDirectoryClient,
}

impl AppState {
    pub fn new(db: SqlitePool, users: UserDirectoryClient) -> Self {
        Self { db, users }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/friends/add", post(api::add_friend))
        .route("/friends/:username", get(api::list_friends))
        .route("/health", get(api::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
