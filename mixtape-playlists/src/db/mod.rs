//! Database access layer for the playlist service

use mixtape_common::Result;
use serde::Serialize;
use sqlx::SqlitePool;

/// Playlist record as served to the front-end
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PlaylistRow {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub created_at: String,
}

/// One song entry inside a playlist; the same song may appear more than once
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PlaylistSongRow {
    pub id: i64,
    pub playlist_id: i64,
    pub song_artist: String,
    pub song_title: String,
    pub added_at: String,
}

/// Create tables if needed; safe to call on every startup
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS playlists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            owner TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS playlist_songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            playlist_id INTEGER NOT NULL,
            song_artist TEXT NOT NULL,
            song_title TEXT NOT NULL,
            added_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS playlist_shares (
            playlist_id INTEGER NOT NULL,
            username TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn name_taken(pool: &SqlitePool, name: &str, owner: &str) -> sqlx::Result<bool> {
    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM playlists WHERE name = ? AND owner = ?")
            .bind(name)
            .bind(owner)
            .fetch_optional(pool)
            .await?;
    Ok(existing.is_some())
}

/// Insert a playlist and return the generated id from the statement
/// itself, not a separate last-insert-id lookup.
pub async fn insert_playlist(
    pool: &SqlitePool,
    name: &str,
    owner: &str,
    created_at: &str,
) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        "INSERT INTO playlists (name, owner, created_at) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(name)
    .bind(owner)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub async fn playlists_by_owner(pool: &SqlitePool, owner: &str) -> sqlx::Result<Vec<PlaylistRow>> {
    sqlx::query_as("SELECT id, name, owner, created_at FROM playlists WHERE owner = ? ORDER BY id")
        .bind(owner)
        .fetch_all(pool)
        .await
}

pub async fn all_playlists(pool: &SqlitePool) -> sqlx::Result<Vec<PlaylistRow>> {
    sqlx::query_as("SELECT id, name, owner, created_at FROM playlists ORDER BY id")
        .fetch_all(pool)
        .await
}

/// Playlists reachable through a share grant for `username`
pub async fn playlists_shared_with(
    pool: &SqlitePool,
    username: &str,
) -> sqlx::Result<Vec<PlaylistRow>> {
    sqlx::query_as(
        "SELECT p.id, p.name, p.owner, p.created_at
         FROM playlists p
         JOIN playlist_shares s ON p.id = s.playlist_id
         WHERE s.username = ?
         ORDER BY p.id",
    )
    .bind(username)
    .fetch_all(pool)
    .await
}

/// Owner of a playlist, or None when the playlist does not exist.
/// Doubles as the playlist existence check.
pub async fn playlist_owner(pool: &SqlitePool, playlist_id: i64) -> sqlx::Result<Option<String>> {
    sqlx::query_scalar("SELECT owner FROM playlists WHERE id = ?")
        .bind(playlist_id)
        .fetch_optional(pool)
        .await
}

pub async fn songs_in_playlist(
    pool: &SqlitePool,
    playlist_id: i64,
) -> sqlx::Result<Vec<PlaylistSongRow>> {
    sqlx::query_as(
        "SELECT id, playlist_id, song_artist, song_title, added_at
         FROM playlist_songs
         WHERE playlist_id = ?
         ORDER BY id",
    )
    .bind(playlist_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_song(
    pool: &SqlitePool,
    playlist_id: i64,
    song_artist: &str,
    song_title: &str,
    added_at: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO playlist_songs (playlist_id, song_artist, song_title, added_at)
         VALUES (?, ?, ?, ?)",
    )
    .bind(playlist_id)
    .bind(song_artist)
    .bind(song_title)
    .bind(added_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Atomic conditional insert closing the duplicate-share race: two
/// racing shares for the same `(playlist, recipient)` pair get at most
/// one success. Returns false when the grant already existed.
pub async fn insert_share_if_absent(
    pool: &SqlitePool,
    playlist_id: i64,
    username: &str,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        "INSERT INTO playlist_shares (playlist_id, username)
         SELECT ?1, ?2
         WHERE NOT EXISTS (
             SELECT 1 FROM playlist_shares WHERE playlist_id = ?1 AND username = ?2
         )",
    )
    .bind(playlist_id)
    .bind(username)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}
