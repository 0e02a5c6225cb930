//! HTTP handlers for the identity store

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use mixtape_common::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::{db, AppState};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExistsQuery {
    pub username: Option<String>,
}

/// POST /users/register
///
/// 201 on success, 409 when the username is already taken.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let username = ApiError::require(body.username, "username")?;
    let password = ApiError::require(body.password, "password")?;

    let inserted = db::insert_user_if_absent(&state.db, &username, &password).await?;
    if !inserted {
        return Err(ApiError::Conflict("User already exists".into()));
    }

    info!(username = %username, "registered new user");
    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "User created successfully"})),
    ))
}

/// POST /users/login
///
/// 200 when the pair matches a stored record, 401 otherwise.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<Value>, ApiError> {
    let username = ApiError::require(body.username, "username")?;
    let password = ApiError::require(body.password, "password")?;

    if db::credentials_match(&state.db, &username, &password).await? {
        Ok(Json(json!({"message": "User logged in successfully"})))
    } else {
        Err(ApiError::Unauthorized(
            "Invalid username or password".into(),
        ))
    }
}

/// GET /users/exists?username=x
pub async fn user_exists(
    State(state): State<AppState>,
    Query(query): Query<ExistsQuery>,
) -> Result<Json<Value>, ApiError> {
    let username = query.username.filter(|u| !u.is_empty()).ok_or_else(|| {
        ApiError::BadRequest("Missing query parameter: username".into())
    })?;

    let exists = db::user_exists(&state.db, &username).await?;
    Ok(Json(json!({"exists": exists})))
}

/// GET /users/:username
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<db::UserRecord>, ApiError> {
    match db::find_user(&state.db, &username).await? {
        Some(user) => Ok(Json(user)),
        None => Err(ApiError::NotFound(
            "The specified user could not be found in the system.".into(),
        )),
    }
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<db::UserRecord>>, ApiError> {
    Ok(Json(db::list_users(&state.db).await?))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "mixtape-users".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
