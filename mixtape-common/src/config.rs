//! Configuration loading and resolution
//!
//! Every service resolves its settings through the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`MIXTAPE_*`)
//! 3. TOML config file (`~/.config/mixtape/config.toml`)
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_USERS_PORT: u16 = 7751;
pub const DEFAULT_FRIENDS_PORT: u16 = 7752;
pub const DEFAULT_PLAYLISTS_PORT: u16 = 7753;
pub const DEFAULT_ACTIVITIES_PORT: u16 = 7754;
/// The song catalogue is an external collaborator; only its URL is known here
pub const DEFAULT_SONGS_PORT: u16 = 7755;

/// Command-line surface shared by all service binaries
#[derive(Debug, Default, clap::Parser)]
pub struct ServiceArgs {
    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Path to this service's SQLite database file
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Resolved configuration for one service process
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub database_path: PathBuf,
    pub peers: PeerUrls,
}

/// Base URLs of the peer services this process may call
#[derive(Debug, Clone)]
pub struct PeerUrls {
    pub users: String,
    pub songs: String,
    pub friends: String,
    pub activities: String,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    peers: PeerSection,
    #[serde(flatten)]
    services: HashMap<String, ServiceSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceSection {
    port: Option<u16>,
    database: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct PeerSection {
    users: Option<String>,
    songs: Option<String>,
    friends: Option<String>,
    activities: Option<String>,
}

impl ServiceConfig {
    /// Resolve the configuration for `service` ("users", "friends", ...)
    /// following the CLI > env > TOML > default priority order.
    pub fn load(service: &str, default_port: u16, args: &ServiceArgs) -> Result<Self> {
        let file = load_config_file(args.config.as_deref())?;
        let section = file.services.get(service);

        let port = args
            .port
            .or_else(|| env_port("MIXTAPE_PORT"))
            .or_else(|| section.and_then(|s| s.port))
            .unwrap_or(default_port);

        let database_path = args
            .database
            .clone()
            .or_else(|| std::env::var("MIXTAPE_DATABASE").ok().map(PathBuf::from))
            .or_else(|| section.and_then(|s| s.database.clone()))
            .unwrap_or_else(|| default_database_path(service));

        let peers = PeerUrls {
            users: peer_url("MIXTAPE_USERS_URL", &file.peers.users, DEFAULT_USERS_PORT),
            songs: peer_url("MIXTAPE_SONGS_URL", &file.peers.songs, DEFAULT_SONGS_PORT),
            friends: peer_url("MIXTAPE_FRIENDS_URL", &file.peers.friends, DEFAULT_FRIENDS_PORT),
            activities: peer_url(
                "MIXTAPE_ACTIVITIES_URL",
                &file.peers.activities,
                DEFAULT_ACTIVITIES_PORT,
            ),
        };

        Ok(ServiceConfig {
            port,
            database_path,
            peers,
        })
    }
}

fn env_port(var: &str) -> Option<u16> {
    std::env::var(var).ok().and_then(|v| v.parse().ok())
}

fn peer_url(env_var: &str, file_value: &Option<String>, default_port: u16) -> String {
    std::env::var(env_var)
        .ok()
        .or_else(|| file_value.clone())
        .unwrap_or_else(|| format!("http://127.0.0.1:{}", default_port))
}

/// Parse the config file if one exists; an absent file is not an error,
/// a present-but-invalid one is.
fn load_config_file(explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match dirs::config_dir().map(|d| d.join("mixtape").join("config.toml")) {
            Some(p) if p.exists() => p,
            _ => return Ok(FileConfig::default()),
        },
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Cannot parse {}: {}", path.display(), e)))
}

/// OS-dependent default location for a service's database file
fn default_database_path(service: &str) -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("mixtape"))
        .unwrap_or_else(|| PathBuf::from("./mixtape_data"))
        .join(format!("{}.db", service))
}
