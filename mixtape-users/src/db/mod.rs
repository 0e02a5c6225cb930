//! Database access layer for the identity store

use mixtape_common::Result;
use serde::Serialize;
use sqlx::SqlitePool;

/// Identity record.
///
/// The password column is an opaque credential stored and compared in
/// the clear; credential hashing is out of scope for this service.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password: String,
}

/// Create tables if needed; safe to call on every startup
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            password TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn user_exists(pool: &SqlitePool, username: &str) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Conditional insert: registration succeeds only if the username is
/// still free at the moment of the insert. Two racing registrations for
/// the same name cannot both return true.
pub async fn insert_user_if_absent(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        "INSERT INTO users (username, password)
         SELECT ?, ?
         WHERE NOT EXISTS (SELECT 1 FROM users WHERE username = ?)",
    )
    .bind(username)
    .bind(password)
    .bind(username)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn credentials_match(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> sqlx::Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ? AND password = ?")
            .bind(username)
            .bind(password)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

pub async fn find_user(pool: &SqlitePool, username: &str) -> sqlx::Result<Option<UserRecord>> {
    sqlx::query_as("SELECT id, username, password FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn list_users(pool: &SqlitePool) -> sqlx::Result<Vec<UserRecord>> {
    sqlx::query_as("SELECT id, username, password FROM users ORDER BY id")
        .fetch_all(pool)
        .await
}
