//! mixtape-users library - Identity store
//!
//! Holds the user accounts every other service soft-references by
//! username. Leaf service: it answers existence and credential checks
//! and never calls out to anyone.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Private identity database; no other service touches it directly
    pub db: SqlitePool,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/users", get(api::list_users))
        .route("/users/register", post(api::register))
        .route("/users/login", post(api::login))
        .route("/users/exists", get(api::user_exists))
        .route("/users/:username", get(api::get_user))
        .route("/health", get(api::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
