//! Activity model
//!
//! The four activity kinds share one timeline but carry different
//! fields, so they are a closed sum type rather than one record full of
//! nullable columns. The feed-merge logic matches on it exhaustively;
//! adding a kind without handling it everywhere is a compile error.

use serde::{Deserialize, Serialize};

/// One entry in the activity ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "activity_type", rename_all = "snake_case")]
pub enum Activity {
    CreatePlaylist {
        username: String,
        playlist_id: i64,
        timestamp: String,
    },
    AddSong {
        username: String,
        song_artist: String,
        song_title: String,
        playlist_id: i64,
        timestamp: String,
    },
    MakeFriend {
        username: String,
        username_friend: String,
        timestamp: String,
    },
    SharePlaylist {
        username: String,
        username_friend: String,
        playlist_id: i64,
        timestamp: String,
    },
}

impl Activity {
    /// The acting user; feed visibility is decided on this field alone
    pub fn actor(&self) -> &str {
        match self {
            Activity::CreatePlaylist { username, .. } => username,
            Activity::AddSong { username, .. } => username,
            Activity::MakeFriend { username, .. } => username,
            Activity::SharePlaylist { username, .. } => username,
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            Activity::CreatePlaylist { timestamp, .. } => timestamp,
            Activity::AddSong { timestamp, .. } => timestamp,
            Activity::MakeFriend { timestamp, .. } => timestamp,
            Activity::SharePlaylist { timestamp, .. } => timestamp,
        }
    }
}

/// Feed ordering by activity timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Parse the `sort` query value. Anything other than a literal
    /// "asc" silently falls back to descending — including absent and
    /// unrecognized values.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("asc") => SortOrder::Ascending,
            _ => SortOrder::Descending,
        }
    }

    /// SQL keyword for ORDER BY assembly; a closed enum, never user input
    pub fn sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}
