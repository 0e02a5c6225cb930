//! HTTP handlers for the activity ledger
//!
//! Record handlers trust their callers: the services posting here have
//! already verified the referenced users/playlists exist, so no
//! existence checks are repeated. Caller-supplied timestamps are stored
//! verbatim; absent ones default to now.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use mixtape_common::{time, ApiError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::activity::SortOrder;
use crate::{db, AppState};

const DEFAULT_FEED_SIZE: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub n: Option<String>,
    pub sort: Option<String>,
}

impl FeedQuery {
    /// A non-numeric `n` falls back to the default page size rather
    /// than failing the request, like the `sort` fallback.
    fn limit(&self) -> i64 {
        self.n
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_FEED_SIZE)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistActivity {
    pub username: Option<String>,
    pub playlist_id: Option<i64>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddSongActivity {
    pub username: Option<String>,
    pub song_artist: Option<String>,
    pub song_title: Option<String>,
    pub playlist_id: Option<i64>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MakeFriendActivity {
    pub username: Option<String>,
    pub username_friend: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SharePlaylistActivity {
    pub username: Option<String>,
    pub username_friend: Option<String>,
    pub playlist_id: Option<i64>,
    pub timestamp: Option<String>,
}

fn require_id(value: Option<i64>, name: &str) -> Result<i64, ApiError> {
    value.ok_or_else(|| ApiError::missing_field(name))
}

fn timestamp_or_now(value: Option<String>) -> String {
    value.unwrap_or_else(time::now_string)
}

const RECORDED: &str = "Activity created successfully.";

/// GET /activities?n=10&sort=desc
pub async fn list_recent(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Value>, ApiError> {
    let limit = query.limit();
    let order = SortOrder::parse(query.sort.as_deref());

    let activities = db::recent(&state.db, limit, order).await?;
    Ok(Json(json!({"activities": activities})))
}

/// GET /activities/:username?n=10&sort=desc
///
/// The friend set comes from the friends service, which also performs
/// the user existence check; its not-found propagates as ours.
pub async fn list_friends_recent(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Value>, ApiError> {
    let limit = query.limit();
    let order = SortOrder::parse(query.sort.as_deref());

    let friends = match state.friends.list_friends(&username).await? {
        Some(friends) => friends,
        None => return Err(ApiError::NotFound("User does not exist.".into())),
    };

    let activities = db::recent_by_actors(&state.db, &friends, limit, order).await?;
    Ok(Json(json!({"activities": activities})))
}

/// POST /activities/create-playlist
pub async fn record_create_playlist(
    State(state): State<AppState>,
    Json(body): Json<CreatePlaylistActivity>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let username = ApiError::require(body.username, "username")?;
    let playlist_id = require_id(body.playlist_id, "playlist_id")?;
    let timestamp = timestamp_or_now(body.timestamp);

    db::insert_create_playlist(&state.db, &username, playlist_id, &timestamp).await?;
    Ok((StatusCode::CREATED, Json(json!({"message": RECORDED}))))
}

/// POST /activities/add-song
pub async fn record_add_song(
    State(state): State<AppState>,
    Json(body): Json<AddSongActivity>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let username = ApiError::require(body.username, "username")?;
    let song_artist = ApiError::require(body.song_artist, "song_artist")?;
    let song_title = ApiError::require(body.song_title, "song_title")?;
    let playlist_id = require_id(body.playlist_id, "playlist_id")?;
    let timestamp = timestamp_or_now(body.timestamp);

    db::insert_add_song(
        &state.db,
        &username,
        &song_artist,
        &song_title,
        playlist_id,
        &timestamp,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!({"message": RECORDED}))))
}

/// POST /activities/make-friend
pub async fn record_make_friend(
    State(state): State<AppState>,
    Json(body): Json<MakeFriendActivity>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let username = ApiError::require(body.username, "username")?;
    let username_friend = ApiError::require(body.username_friend, "username_friend")?;
    let timestamp = timestamp_or_now(body.timestamp);

    db::insert_make_friend(&state.db, &username, &username_friend, &timestamp).await?;
    Ok((StatusCode::CREATED, Json(json!({"message": RECORDED}))))
}

/// POST /activities/share-playlist
pub async fn record_share_playlist(
    State(state): State<AppState>,
    Json(body): Json<SharePlaylistActivity>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let username = ApiError::require(body.username, "username")?;
    let username_friend = ApiError::require(body.username_friend, "username_friend")?;
    let playlist_id = require_id(body.playlist_id, "playlist_id")?;
    let timestamp = timestamp_or_now(body.timestamp);

    db::insert_share_playlist(&state.db, &username, &username_friend, playlist_id, &timestamp)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({"message": RECORDED}))))
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
        module: "mixtape-activities".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
