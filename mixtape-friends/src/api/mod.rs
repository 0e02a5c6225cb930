//! HTTP handlers for the friendship graph

use axum::extract::{Path, State};
use axum::Json;
use mixtape_common::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::{db, AppState};

#[derive(Debug, Deserialize)]
pub struct AddFriendRequest {
    pub username: Option<String>,
    pub username_friend: Option<String>,
}

/// POST /friends/add
///
/// Ordered checks: self-friend, both identities exist, pair not already
/// friends. The existence checks are remote and not atomic with the
/// insert; the duplicate check is, via the conditional insert.
pub async fn add_friend(
    State(state): State<AppState>,
    Json(body): Json<AddFriendRequest>,
) -> Result<Json<Value>, ApiError> {
    let username = ApiError::require(body.username, "username")?;
    let username_friend = ApiError::require(body.username_friend, "username_friend")?;

    if username == username_friend {
        return Err(ApiError::BadRequest(
            "You cannot add yourself as a friend".into(),
        ));
    }

    let user_exists = state.users.user_exists(&username).await?;
    let friend_exists = state.users.user_exists(&username_friend).await?;
    if !user_exists || !friend_exists {
        return Err(ApiError::NotFound("User or friend not found".into()));
    }

    let inserted = db::insert_friendship_if_absent(&state.db, &username, &username_friend).await?;
    if !inserted {
        return Err(ApiError::Conflict("Friendship already exists".into()));
    }

    info!(username = %username, friend = %username_friend, "friendship created");
    Ok(Json(json!({"message": "Friend added successfully"})))
}

/// GET /friends/:username
pub async fn list_friends(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.users.user_exists(&username).await? {
        return Err(ApiError::NotFound("User not found".into()));
    }

    let friends: Vec<Value> = db::friends_of(&state.db, &username)
        .await?
        .into_iter()
        .map(|name| json!({"username": name}))
        .collect();
    Ok(Json(json!({"friends": friends})))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "mixtape-friends".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
