//! mixtape-activities library - Activity ledger
//!
//! Append-only log of cross-entity events and the read side of the
//! social feed. Records are never updated or deleted; the feed query
//! resolves the caller's friend set through the friends service and
//! filters the merged timeline by actor.

use axum::Router;
use mixtape_common::clients::FriendGraphClient;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod activity;
pub mod api;
pub mod db;

pub use activity::{Activity, SortOrder};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Private ledger database
    pub db: SqlitePool,
    /// Friend-set resolution for the feed read path
    pub friends: FriendGraphClient,
}

impl AppState {
    pub fn new(db: SqlitePool, friends: FriendGraphClient) -> Self {
        Self { db, friends }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/activities", get(api::list_recent))
        .route("/activities/create-playlist", post(api::record_create_playlist))
        .route("/activities/add-song", post(api::record_add_song))
        .route("/activities/make-friend", post(api::record_make_friend))
        .route("/activities/share-playlist", post(api::record_share_playlist))
        .route("/activities/:username", get(api::list_friends_recent))
        .route("/health", get(api::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
