//! HTTP handlers for the playlist service
//!
//! Write handlers all follow the same sequence: remote precondition
//! checks, local mutation, then a best-effort activity notification.
//! The write is committed once the local insert succeeds; a failed
//! notification is logged and swallowed, never rolled back.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use mixtape_common::clients::ClientError;
use mixtape_common::{time, ApiError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{db, AppState};

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: Option<String>,
    pub owner: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddSongRequest {
    pub song_artist: Option<String>,
    pub song_title: Option<String>,
    pub added_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    pub recipient: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub username: Option<String>,
}

fn log_dropped_notification(kind: &str, err: ClientError) {
    // The triggering write already committed; a missing ledger
    // record is accepted, not retried.
    warn!(kind = kind, "activity notification dropped: {}", err);
}

/// POST /playlists
pub async fn create_playlist(
    State(state): State<AppState>,
    Json(body): Json<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let name = ApiError::require(body.name, "name")?;
    let owner = ApiError::require(body.owner, "owner")?;

    if !state.users.user_exists(&owner).await? {
        return Err(ApiError::NotFound("Owner not found".into()));
    }

    if db::name_taken(&state.db, &name, &owner).await? {
        return Err(ApiError::BadRequest(
            "Playlist name already exists for the specified owner".into(),
        ));
    }

    let id = db::insert_playlist(&state.db, &name, &owner, &time::now_string()).await?;
    info!(playlist_id = id, owner = %owner, "playlist created");

    if let Err(e) = state.activities.playlist_created(&owner, id).await {
        log_dropped_notification("create_playlist", e);
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "message": "Playlist was created successfully",
        })),
    ))
}

/// GET /playlists?username=x — owned playlists, or all without the filter
pub async fn list_playlists(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Value>, ApiError> {
    let playlists = match query.username {
        Some(ref owner) if !owner.is_empty() => db::playlists_by_owner(&state.db, owner).await?,
        _ => db::all_playlists(&state.db).await?,
    };
    Ok(Json(json!({"playlists": playlists})))
}

/// GET /playlists/shared?username=x
pub async fn shared_playlists(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Value>, ApiError> {
    let playlists = match query.username {
        Some(ref username) if !username.is_empty() => {
            db::playlists_shared_with(&state.db, username).await?
        }
        _ => Vec::new(),
    };
    Ok(Json(json!({"playlists": playlists})))
}

/// GET /playlists/:id — songs of one playlist
pub async fn playlist_songs(
    State(state): State<AppState>,
    Path(playlist_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if db::playlist_owner(&state.db, playlist_id).await?.is_none() {
        return Err(ApiError::NotFound("Playlist not found".into()));
    }

    let songs = db::songs_in_playlist(&state.db, playlist_id).await?;
    Ok(Json(json!({"songs": songs})))
}

/// POST /playlists/:id — add a song
pub async fn add_song(
    State(state): State<AppState>,
    Path(playlist_id): Path<i64>,
    Json(body): Json<AddSongRequest>,
) -> Result<Json<Value>, ApiError> {
    let song_artist = ApiError::require(body.song_artist, "song_artist")?;
    let song_title = ApiError::require(body.song_title, "song_title")?;
    let added_by = ApiError::require(body.added_by, "added_by")?;

    if db::playlist_owner(&state.db, playlist_id).await?.is_none() {
        return Err(ApiError::NotFound("Playlist not found".into()));
    }

    if !state.catalog.song_exists(&song_title, &song_artist).await? {
        return Err(ApiError::NotFound("Song not found".into()));
    }

    db::insert_song(
        &state.db,
        playlist_id,
        &song_artist,
        &song_title,
        &time::now_string(),
    )
    .await?;
    info!(playlist_id, artist = %song_artist, title = %song_title, "song added");

    if let Err(e) = state
        .activities
        .song_added(&added_by, &song_artist, &song_title, playlist_id)
        .await
    {
        log_dropped_notification("add_song", e);
    }

    Ok(Json(json!({"message": "Song added to playlist successfully"})))
}

/// POST /playlists/:id/shares
pub async fn share_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<i64>,
    Json(body): Json<ShareRequest>,
) -> Result<Json<Value>, ApiError> {
    let recipient = ApiError::require(body.recipient, "recipient")?;

    let owner = match db::playlist_owner(&state.db, playlist_id).await? {
        Some(owner) => owner,
        None => return Err(ApiError::NotFound("Playlist not found".into())),
    };

    if !state.users.user_exists(&recipient).await? {
        return Err(ApiError::NotFound("User not found".into()));
    }

    if owner == recipient {
        return Err(ApiError::BadRequest(
            "You cannot share the playlist with yourself".into(),
        ));
    }

    let inserted = db::insert_share_if_absent(&state.db, playlist_id, &recipient).await?;
    if !inserted {
        return Err(ApiError::Conflict(
            "Playlist is already shared with the specified user".into(),
        ));
    }
    info!(playlist_id, recipient = %recipient, "playlist shared");

    if let Err(e) = state
        .activities
        .playlist_shared(&owner, &recipient, playlist_id)
        .await
    {
        log_dropped_notification("share_playlist", e);
    }

    Ok(Json(json!({"message": "Playlist shared successfully"})))
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
        module: "mixtape-playlists".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
