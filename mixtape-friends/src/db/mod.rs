//! Database access layer for the friendship graph
//!
//! Storage is directional (`username` befriended `username_friend`) but
//! the relation is symmetric: reads resolve both directions, and the
//! uniqueness of an unordered pair is enforced by the conditional insert
//! rather than a constraint.

use mixtape_common::Result;
use sqlx::SqlitePool;

/// Create tables if needed; safe to call on every startup
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS friends (
            username TEXT NOT NULL,
            username_friend TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Atomic conditional insert closing the duplicate-friendship race.
///
/// The insert lands only if no row exists for the pair in either
/// direction; two racing calls for `{a, b}` get at most one success.
/// Returns false when the friendship already existed.
pub async fn insert_friendship_if_absent(
    pool: &SqlitePool,
    username: &str,
    username_friend: &str,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        "INSERT INTO friends (username, username_friend)
         SELECT ?1, ?2
         WHERE NOT EXISTS (
             SELECT 1 FROM friends
             WHERE (username = ?1 AND username_friend = ?2)
                OR (username = ?2 AND username_friend = ?1)
         )",
    )
    .bind(username)
    .bind(username_friend)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Symmetric closure: friends named on either side of a row
pub async fn friends_of(pool: &SqlitePool, username: &str) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar(
        "SELECT username_friend FROM friends WHERE username = ?1
         UNION
         SELECT username FROM friends WHERE username_friend = ?1",
    )
    .bind(username)
    .fetch_all(pool)
    .await
}
