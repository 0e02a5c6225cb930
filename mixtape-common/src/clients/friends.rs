//! Client for the friendship graph's read contract

use super::{build_http_client, ClientError};
use serde::Deserialize;

const SERVICE: &str = "friends";

#[derive(Debug, Deserialize)]
struct FriendEntry {
    username: String,
}

#[derive(Debug, Deserialize)]
struct FriendsResponse {
    friends: Vec<FriendEntry>,
}

/// Resolves a user's friend set via the friends service.
///
/// The friends service performs the user existence check itself, so a
/// 404 here means "no such user" and is reported as `None` rather than
/// an error.
#[derive(Debug, Clone)]
pub struct FriendGraphClient {
    base_url: String,
    http: reqwest::Client,
}

impl FriendGraphClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: base_url.into(),
            http: build_http_client(SERVICE)?,
        })
    }

    /// GET /friends/:username
    pub async fn list_friends(&self, username: &str) -> Result<Option<Vec<String>>, ClientError> {
        let url = format!("{}/friends/{}", self.base_url, username);
        let response = self.http.get(&url).send().await.map_err(|e| {
            ClientError::Unavailable {
                service: SERVICE,
                detail: e.to_string(),
            }
        })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ClientError::BadResponse {
                service: SERVICE,
                detail: format!("status {}", response.status()),
            });
        }

        let body: FriendsResponse =
            response.json().await.map_err(|e| ClientError::BadResponse {
                service: SERVICE,
                detail: e.to_string(),
            })?;
        Ok(Some(body.friends.into_iter().map(|f| f.username).collect()))
    }
}
