//! Client for the external song catalogue
//!
//! The catalogue is not part of this workspace; only its lookup contract
//! is. It answers presence with a 200 status and a bare JSON boolean.

use super::{build_http_client, ClientError};

const SERVICE: &str = "songs";

#[derive(Debug, Clone)]
pub struct SongCatalogClient {
    base_url: String,
    http: reqwest::Client,
}

impl SongCatalogClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: base_url.into(),
            http: build_http_client(SERVICE)?,
        })
    }

    /// GET /songs/exist?title=x&artist=y
    ///
    /// A non-200 answer counts as "song not present", matching the
    /// catalogue's contract; only a transport failure is an error.
    pub async fn song_exists(&self, title: &str, artist: &str) -> Result<bool, ClientError> {
        let url = format!("{}/songs/exist", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("title", title), ("artist", artist)])
            .send()
            .await
            .map_err(|e| ClientError::Unavailable {
                service: SERVICE,
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Ok(false);
        }

        response.json::<bool>().await.map_err(|e| ClientError::BadResponse {
            service: SERVICE,
            detail: e.to_string(),
        })
    }
}
