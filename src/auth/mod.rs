//! Token issuance and verification plus the bearer-auth middleware.
//!
//! Tokens are stateless HS256 JWTs carrying the subject id, username and
//! user-type id. There is no revocation list: a token stays valid for its
//! whole lifetime once issued.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub mod password;

use crate::errors::ServiceError;

/// Claim structure for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's internal id, stringified
    pub sub: String,
    pub username: String,
    pub user_type_id: i16,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Identity attached to a request after the middleware verified its token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub username: String,
    pub user_type_id: i16,
}

impl TryFrom<&Claims> for AuthenticatedUser {
    type Error = AuthError;

    fn try_from(claims: &Claims) -> Result<Self, Self::Error> {
        let user_id = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        Ok(Self {
            user_id,
            username: claims.username.clone(),
            user_type_id: claims.user_type_id,
        })
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiration: Duration,
}

/// Issues and verifies access tokens. Stateless: needs no storage handle.
#[derive(Clone, Debug)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Signs an access token for a user.
    pub fn issue_token(
        &self,
        user_id: i32,
        username: &str,
        user_type_id: i16,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires_at = now
            + ChronoDuration::from_std(self.config.token_expiration)
                .map_err(|_| AuthError::TokenCreation("invalid token duration".to_string()))?;

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            user_type_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validates a token and extracts its claims.
    ///
    /// Expired and malformed tokens are distinct variants internally; both
    /// render as the same 401 externally.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; the default 60s leeway would let stale tokens by.
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Middleware guarding the authenticated routes: verifies the bearer token
/// and inserts an [`AuthenticatedUser`] into the request extensions.
pub async fn auth_middleware(
    State(auth): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(request.headers()).ok_or(AuthError::MissingToken)?;
    let claims = auth.verify_token(token)?;
    let user = AuthenticatedUser::try_from(&claims)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Errors surfaced by the `/auth/*` endpoints and the token middleware.
///
/// Rendered as `{"error": message}`, the body shape both mobile clients
/// already parse for these routes.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username")]
    InvalidUsername,

    #[error("Invalid password")]
    InvalidClientDigest,

    #[error("Invalid login credentials")]
    InvalidLoginRequest,

    #[error("Username already exists")]
    UsernameTaken,

    /// Deliberately generic: covers both unknown username and hash mismatch
    /// so responses cannot be used to enumerate accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing authorization token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUsername | Self::InvalidClientDigest | Self::InvalidLoginRequest => {
                StatusCode::BAD_REQUEST
            }
            Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::UsernameTaken => StatusCode::CONFLICT,
            Self::InvalidCredentials
            | Self::MissingToken
            | Self::InvalidToken
            | Self::TokenExpired => StatusCode::UNAUTHORIZED,
            Self::TokenCreation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Service(err) => err.status_code(),
        }
    }

    fn response_message(&self) -> String {
        match self {
            Self::TokenCreation(_) => "Internal server error.".to_string(),
            Self::Service(err) => err.response_message(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.response_message() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(AuthConfig {
            jwt_secret: "unit-test-signing-secret-0123456789".to_string(),
            token_expiration: Duration::from_secs(3600),
        })
    }

    #[test]
    fn issued_token_verifies_with_same_claims() {
        let auth = service();
        let token = auth.issue_token(42, "baileyc", 1).unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "baileyc");
        assert_eq!(claims.user_type_id, 1);
        assert!(claims.exp > claims.iat);

        let user = AuthenticatedUser::try_from(&claims).unwrap();
        assert_eq!(user.user_id, 42);
    }

    #[test]
    fn expired_token_is_rejected_with_expiry_reason() {
        let auth = service();
        let past = Utc::now().timestamp() - 600;
        let claims = Claims {
            sub: "42".to_string(),
            username: "baileyc".to_string(),
            user_type_id: 1,
            iat: past - 3600,
            exp: past,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("unit-test-signing-secret-0123456789".as_bytes()),
        )
        .unwrap();

        let err = auth.verify_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
        // Externally still a plain 401.
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn garbage_token_is_malformed_not_expired() {
        let err = service().verify_token("not.a.jwt").unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = AuthService::new(AuthConfig {
            jwt_secret: "a-completely-different-secret-9876543210".to_string(),
            token_expiration: Duration::from_secs(3600),
        });
        let token = other.issue_token(7, "intruder", 3).unwrap();

        let err = service().verify_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert!(bearer_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert!(bearer_token(&headers).is_none());
    }

    #[test]
    fn credential_failures_share_one_external_message() {
        assert_eq!(
            AuthError::InvalidCredentials.response_message(),
            "Invalid credentials"
        );
        // No variant hints at whether the username existed.
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
