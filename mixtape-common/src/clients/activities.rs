//! Client for the activity ledger's record contract
//!
//! Used by the playlist service for its post-commit notifications. The
//! caller decides what a failure means; for Mixtape's writes the answer
//! is always "log it and move on" — the triggering mutation has already
//! committed and is never rolled back.

use super::{build_http_client, ClientError};
use serde_json::json;

const SERVICE: &str = "activities";

#[derive(Debug, Clone)]
pub struct ActivityLogClient {
    base_url: String,
    http: reqwest::Client,
}

impl ActivityLogClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: base_url.into(),
            http: build_http_client(SERVICE)?,
        })
    }

    /// POST /activities/create-playlist
    pub async fn playlist_created(
        &self,
        username: &str,
        playlist_id: i64,
    ) -> Result<(), ClientError> {
        self.post(
            "/activities/create-playlist",
            json!({
                "username": username,
                "playlist_id": playlist_id,
            }),
        )
        .await
    }

    /// POST /activities/add-song
    pub async fn song_added(
        &self,
        username: &str,
        song_artist: &str,
        song_title: &str,
        playlist_id: i64,
    ) -> Result<(), ClientError> {
        self.post(
            "/activities/add-song",
            json!({
                "username": username,
                "song_artist": song_artist,
                "song_title": song_title,
                "playlist_id": playlist_id,
            }),
        )
        .await
    }

    /// POST /activities/share-playlist
    pub async fn playlist_shared(
        &self,
        username: &str,
        username_friend: &str,
        playlist_id: i64,
    ) -> Result<(), ClientError> {
        self.post(
            "/activities/share-playlist",
            json!({
                "username": username,
                "username_friend": username_friend,
                "playlist_id": playlist_id,
            }),
        )
        .await
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<(), ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).json(&body).send().await.map_err(|e| {
            ClientError::Unavailable {
                service: SERVICE,
                detail: e.to_string(),
            }
        })?;

        if !response.status().is_success() {
            return Err(ClientError::BadResponse {
                service: SERVICE,
                detail: format!("status {}", response.status()),
            });
        }
        Ok(())
    }
}
