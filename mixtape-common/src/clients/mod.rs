//! HTTP clients for the peer-service contracts
//!
//! All cross-service access in Mixtape goes through these clients; no
//! service ever reads another service's database. Calls are synchronous
//! request/response with a bounded timeout — an unbounded block on a
//! downstream service is a resource-exhaustion hazard under load, so a
//! timeout is treated exactly like any other dependency failure.

mod activities;
mod catalog;
mod friends;
mod users;

pub use activities::ActivityLogClient;
pub use catalog::SongCatalogClient;
pub use friends::FriendGraphClient;
pub use users::UserDirectoryClient;

use crate::ApiError;
use std::time::Duration;
use thiserror::Error;

/// Ceiling on every outbound call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// Errors from calls to peer services
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or timeout; the peer never gave an answer
    #[error("{service}: {detail}")]
    Unavailable {
        service: &'static str,
        detail: String,
    },

    /// The peer answered, but not with anything this contract allows
    #[error("{service} returned an unexpected response: {detail}")]
    BadResponse {
        service: &'static str,
        detail: String,
    },
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        ApiError::Dependency(err.to_string())
    }
}

pub(crate) fn build_http_client(service: &'static str) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ClientError::Unavailable {
            service,
            detail: e.to_string(),
        })
}
