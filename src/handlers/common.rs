//! Shared request/response plumbing for the HTTP handlers.

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::errors::ServiceError;

/// JSON extractor for the item endpoints. Body rejections (bad JSON, wrong
/// types, missing fields) become a 400 with the standard error envelope
/// instead of axum's default 422.
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(ServiceError::BadRequest(rejection.body_text())),
        }
    }
}

/// JSON extractor for the `/auth/*` endpoints; same 400 mapping but rendered
/// in their `{"error": ...}` body shape.
pub struct AuthJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AuthJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AuthJson(value)),
            Err(rejection) => Err(AuthError::MalformedRequest(rejection.body_text())),
        }
    }
}

/// 200 response with the `{"status": "ok", ...}` envelope.
pub fn ok_response(payload: Value) -> Response {
    envelope(StatusCode::OK, payload)
}

/// 201 response with the `{"status": "ok", ...}` envelope.
pub fn created_response(payload: Value) -> Response {
    envelope(StatusCode::CREATED, payload)
}

fn envelope(status: StatusCode, payload: Value) -> Response {
    let mut body = json!({ "status": "ok" });
    if let (Some(obj), Value::Object(extra)) = (body.as_object_mut(), payload) {
        obj.extend(extra);
    }
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn envelope_merges_payload_after_status() {
        let response = ok_response(json!({ "message": "pong" }));
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["message"], "pong");
    }

    #[tokio::test]
    async fn created_uses_201() {
        let response = created_response(json!({}));
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
