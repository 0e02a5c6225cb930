//! Client for the identity service's existence-check contract

use super::{build_http_client, ClientError};
use serde::Deserialize;

const SERVICE: &str = "users";

#[derive(Debug, Deserialize)]
struct ExistsResponse {
    exists: bool,
}

/// Asks the identity service whether a username is registered.
///
/// This is the gate in front of every mutation that references a user:
/// the mutation must not proceed unless the check comes back positive.
#[derive(Debug, Clone)]
pub struct UserDirectoryClient {
    base_url: String,
    http: reqwest::Client,
}

impl UserDirectoryClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: base_url.into(),
            http: build_http_client(SERVICE)?,
        })
    }

    /// GET /users/exists?username=x
    pub async fn user_exists(&self, username: &str) -> Result<bool, ClientError> {
        let url = format!("{}/users/exists", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("username", username)])
            .send()
            .await
            .map_err(|e| ClientError::Unavailable {
                service: SERVICE,
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ClientError::BadResponse {
                service: SERVICE,
                detail: format!("status {}", response.status()),
            });
        }

        let body: ExistsResponse =
            response.json().await.map_err(|e| ClientError::BadResponse {
                service: SERVICE,
                detail: e.to_string(),
            })?;
        Ok(body.exists)
    }
}
