mod common;

use axum::http::{Method, StatusCode};
use sea_orm::EntityTrait;
use serde_json::json;

use common::{response_json, TestApp, OTHER_DIGEST, TEST_DIGEST};
use stockroom_api::entities::user::Entity as User;
use stockroom_api::services::users::DEFAULT_USER_TYPE_ID;

#[tokio::test]
async fn register_returns_token_that_works() {
    let app = TestApp::new().await;
    let token = app.register("warehouse_bailey", TEST_DIGEST).await;

    let response = app
        .request(Method::GET, "/auth/me", None, Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["username"], "warehouse_bailey");
    assert_eq!(body["user_type_id"], i64::from(DEFAULT_USER_TYPE_ID));
    assert!(body["user_id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn register_rejects_bad_username() {
    let app = TestApp::new().await;

    for username in ["ab", "", "has space", "way_too_long_username_over_thirty_chars"] {
        let response = app
            .request(
                Method::POST,
                "/auth/register",
                Some(json!({ "username": username, "client_password_hash": TEST_DIGEST })),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "username {username:?}");

        let body = response_json(response).await;
        assert_eq!(body["error"], "Invalid username");
    }
}

#[tokio::test]
async fn register_rejects_malformed_digest() {
    let app = TestApp::new().await;

    for digest in ["", "short", "not hex but exactly sixty-four characters long, padded to fit!!"] {
        let response = app
            .request(
                Method::POST,
                "/auth/register",
                Some(json!({ "username": "warehouse_bailey", "client_password_hash": digest })),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_json(response).await;
        assert_eq!(body["error"], "Invalid password");
    }
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = TestApp::new().await;
    app.register("warehouse_bailey", TEST_DIGEST).await;

    let response = app
        .request(
            Method::POST,
            "/auth/register",
            Some(json!({ "username": "warehouse_bailey", "client_password_hash": OTHER_DIGEST })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Username already exists");
}

#[tokio::test]
async fn login_succeeds_with_matching_digest() {
    let app = TestApp::new().await;
    app.register("warehouse_bailey", TEST_DIGEST).await;

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": "warehouse_bailey", "client_password_hash": TEST_DIGEST })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let token = body["access_token"].as_str().unwrap();

    let me = app.request(Method::GET, "/auth/me", None, Some(token)).await;
    assert_eq!(me.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = TestApp::new().await;
    app.register("warehouse_bailey", TEST_DIGEST).await;

    // Wrong password for an existing account.
    let wrong_password = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": "warehouse_bailey", "client_password_hash": OTHER_DIGEST })),
            None,
        )
        .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password_body = response_json(wrong_password).await;

    // Username that was never registered.
    let unknown_user = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": "nobody_here", "client_password_hash": OTHER_DIGEST })),
            None,
        )
        .await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_user_body = response_json(unknown_user).await;

    assert_eq!(wrong_password_body, unknown_user_body);
    assert_eq!(wrong_password_body["error"], "Invalid credentials");
}

#[tokio::test]
async fn login_with_syntactically_bad_credentials_is_400() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": "", "client_password_hash": "nothex" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Invalid login credentials");
}

#[tokio::test]
async fn login_stamps_last_login_at() {
    let app = TestApp::new().await;
    app.register("warehouse_bailey", TEST_DIGEST).await;

    let before = User::find()
        .all(&*app.state.db)
        .await
        .unwrap()
        .pop()
        .unwrap();
    assert!(before.last_login_at.is_none());

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": "warehouse_bailey", "client_password_hash": TEST_DIGEST })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let after = User::find()
        .all(&*app.state.db)
        .await
        .unwrap()
        .pop()
        .unwrap();
    assert!(after.last_login_at.is_some());
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let app = TestApp::new().await;

    let missing = app.request(Method::GET, "/auth/me", None, None).await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(missing).await;
    assert_eq!(body["error"], "Missing authorization token");

    let garbage = app
        .request(Method::GET, "/auth/me", None, Some("not.a.token"))
        .await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(garbage).await;
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn malformed_register_body_is_400_not_422() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/auth/register",
            Some(json!({ "username": "warehouse_bailey" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert!(body["error"].is_string());
}
