//! Database access layer for the activity ledger
//!
//! Storage is one append-only table per activity kind, merged into a
//! single timeline at query time. Timestamps are stored as
//! `YYYY-MM-DD HH:MM:SS` text, so ORDER BY on the column is time order.

use mixtape_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::activity::{Activity, SortOrder};

/// Create tables if needed; safe to call on every startup
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS activity_create_playlist (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            playlist_id INTEGER NOT NULL,
            activity_timestamp TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS activity_add_song (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            song_artist TEXT NOT NULL,
            song_title TEXT NOT NULL,
            playlist_id INTEGER NOT NULL,
            activity_timestamp TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS activity_make_friend (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            username_friend TEXT NOT NULL,
            activity_timestamp TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS activity_share_playlist (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            username_friend TEXT NOT NULL,
            playlist_id INTEGER NOT NULL,
            activity_timestamp TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn insert_create_playlist(
    pool: &SqlitePool,
    username: &str,
    playlist_id: i64,
    timestamp: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO activity_create_playlist (username, playlist_id, activity_timestamp)
         VALUES (?, ?, ?)",
    )
    .bind(username)
    .bind(playlist_id)
    .bind(timestamp)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_add_song(
    pool: &SqlitePool,
    username: &str,
    song_artist: &str,
    song_title: &str,
    playlist_id: i64,
    timestamp: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO activity_add_song
             (username, song_artist, song_title, playlist_id, activity_timestamp)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(username)
    .bind(song_artist)
    .bind(song_title)
    .bind(playlist_id)
    .bind(timestamp)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_make_friend(
    pool: &SqlitePool,
    username: &str,
    username_friend: &str,
    timestamp: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO activity_make_friend (username, username_friend, activity_timestamp)
         VALUES (?, ?, ?)",
    )
    .bind(username)
    .bind(username_friend)
    .bind(timestamp)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_share_playlist(
    pool: &SqlitePool,
    username: &str,
    username_friend: &str,
    playlist_id: i64,
    timestamp: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO activity_share_playlist
             (username, username_friend, playlist_id, activity_timestamp)
         VALUES (?, ?, ?, ?)",
    )
    .bind(username)
    .bind(username_friend)
    .bind(playlist_id)
    .bind(timestamp)
    .execute(pool)
    .await?;
    Ok(())
}

/// The four kind tables projected onto one column set.
/// Tie-breaking between equal timestamps is whatever SQLite yields.
const MERGED_ACTIVITIES: &str = "\
    SELECT 'create_playlist' AS activity_type, username, NULL AS username_friend, \
           NULL AS song_artist, NULL AS song_title, playlist_id, activity_timestamp \
    FROM activity_create_playlist \
    UNION ALL \
    SELECT 'add_song' AS activity_type, username, NULL AS username_friend, \
           song_artist, song_title, playlist_id, activity_timestamp \
    FROM activity_add_song \
    UNION ALL \
    SELECT 'make_friend' AS activity_type, username, username_friend, \
           NULL AS song_artist, NULL AS song_title, NULL AS playlist_id, activity_timestamp \
    FROM activity_make_friend \
    UNION ALL \
    SELECT 'share_playlist' AS activity_type, username, username_friend, \
           NULL AS song_artist, NULL AS song_title, playlist_id, activity_timestamp \
    FROM activity_share_playlist";

fn decode_activity(row: &SqliteRow) -> sqlx::Result<Activity> {
    let kind: String = row.try_get("activity_type")?;
    let username: String = row.try_get("username")?;
    let timestamp: String = row.try_get("activity_timestamp")?;

    match kind.as_str() {
        "create_playlist" => Ok(Activity::CreatePlaylist {
            username,
            playlist_id: row.try_get("playlist_id")?,
            timestamp,
        }),
        "add_song" => Ok(Activity::AddSong {
            username,
            song_artist: row.try_get("song_artist")?,
            song_title: row.try_get("song_title")?,
            playlist_id: row.try_get("playlist_id")?,
            timestamp,
        }),
        "make_friend" => Ok(Activity::MakeFriend {
            username,
            username_friend: row.try_get("username_friend")?,
            timestamp,
        }),
        "share_playlist" => Ok(Activity::SharePlaylist {
            username,
            username_friend: row.try_get("username_friend")?,
            playlist_id: row.try_get("playlist_id")?,
            timestamp,
        }),
        other => Err(sqlx::Error::Decode(
            format!("unknown activity kind: {}", other).into(),
        )),
    }
}

/// Most recent activities across all kinds
pub async fn recent(pool: &SqlitePool, limit: i64, order: SortOrder) -> sqlx::Result<Vec<Activity>> {
    let sql = format!(
        "WITH combined_activities AS ({}) \
         SELECT * FROM combined_activities \
         ORDER BY activity_timestamp {} LIMIT ?",
        MERGED_ACTIVITIES,
        order.sql()
    );

    let rows = sqlx::query(&sql).bind(limit).fetch_all(pool).await?;
    rows.iter().map(decode_activity).collect()
}

/// Most recent activities whose actor is one of `actors`
pub async fn recent_by_actors(
    pool: &SqlitePool,
    actors: &[String],
    limit: i64,
    order: SortOrder,
) -> sqlx::Result<Vec<Activity>> {
    if actors.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; actors.len()].join(", ");
    let sql = format!(
        "WITH combined_activities AS ({}) \
         SELECT * FROM combined_activities \
         WHERE username IN ({}) \
         ORDER BY activity_timestamp {} LIMIT ?",
        MERGED_ACTIVITIES,
        placeholders,
        order.sql()
    );

    let mut query = sqlx::query(&sql);
    for actor in actors {
        query = query.bind(actor);
    }
    let rows = query.bind(limit).fetch_all(pool).await?;
    rows.iter().map(decode_activity).collect()
}
