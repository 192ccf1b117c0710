//! The `/auth/*` endpoints: registration, login and token introspection.
//!
//! Clients never send plaintext passwords; they send a SHA-256 hex digest
//! which the server slow-hashes with argon2 before storage.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::auth::password::{hash_client_digest, is_valid_client_digest, verify_client_digest};
use crate::auth::{AuthError, AuthenticatedUser};
use crate::errors::ServiceError;
use crate::handlers::common::AuthJson;
use crate::services::users::is_valid_username;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub client_password_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub client_password_hash: String,
}

/// `POST /auth/register`: creates an Employee account and returns a token so
/// the client is signed in immediately.
#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn register(
    State(state): State<AppState>,
    AuthJson(body): AuthJson<RegisterRequest>,
) -> Result<Response, AuthError> {
    let username = body.username.trim();
    if !is_valid_username(username) {
        return Err(AuthError::InvalidUsername);
    }
    if !is_valid_client_digest(&body.client_password_hash) {
        return Err(AuthError::InvalidClientDigest);
    }

    let password_hash = hash_client_digest(&body.client_password_hash)?;
    let user = state
        .users
        .register(username, &password_hash)
        .await
        .map_err(|e| match e {
            ServiceError::Conflict(_) => AuthError::UsernameTaken,
            other => AuthError::Service(other),
        })?;

    let token = state
        .auth
        .issue_token(user.id, &user.username, user.user_type_id)?;

    Ok((StatusCode::CREATED, Json(json!({ "access_token": token }))).into_response())
}

/// `POST /auth/login`: verifies the client digest and returns a fresh token.
///
/// Unknown username and wrong password produce the same 401 body.
#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn login(
    State(state): State<AppState>,
    AuthJson(body): AuthJson<LoginRequest>,
) -> Result<Response, AuthError> {
    let username = body.username.trim();
    if username.is_empty() || !is_valid_client_digest(&body.client_password_hash) {
        return Err(AuthError::InvalidLoginRequest);
    }

    let user = match state.users.find_by_username(username).await? {
        Some(user) => user,
        None => {
            debug!("login rejected: unknown username");
            return Err(AuthError::InvalidCredentials);
        }
    };

    if !verify_client_digest(&user.password_hash, &body.client_password_hash)? {
        debug!(user_id = user.id, "login rejected: digest mismatch");
        return Err(AuthError::InvalidCredentials);
    }

    state
        .users
        .record_login(user.id, chrono::Utc::now().naive_utc())
        .await?;

    let token = state
        .auth
        .issue_token(user.id, &user.username, user.user_type_id)?;

    Ok((StatusCode::OK, Json(json!({ "access_token": token }))).into_response())
}

/// `GET /auth/me`: echoes the identity inside the presented token.
pub async fn me(Extension(user): Extension<AuthenticatedUser>) -> impl IntoResponse {
    Json(json!({
        "user_id": user.user_id,
        "username": user.username,
        "user_type_id": user.user_type_id,
    }))
}
