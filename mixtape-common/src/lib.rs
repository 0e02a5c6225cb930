//! # Mixtape Common Library
//!
//! Shared code for all Mixtape microservices including:
//! - Error types and the HTTP error-to-status mapping
//! - Configuration resolution (CLI / env / TOML / defaults)
//! - Database bootstrap helpers
//! - HTTP clients for the peer-service contracts
//! - Timestamp formatting

pub mod clients;
pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{ApiError, Error, Result};
