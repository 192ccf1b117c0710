//! Backend service for the warehouse inventory mobile clients.
//!
//! Exposes a small JSON API: token-based authentication under `/auth/*` and
//! bearer-protected inventory CRUD. Storage is MariaDB/MySQL in production
//! and SQLite in the test harness, both through the same ORM layer.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod services;
pub mod validation;

use auth::{AuthConfig, AuthService};
use config::AppConfig;
use db::DbPool;
use services::inventory::InventoryService;
use services::users::UserService;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub auth: Arc<AuthService>,
    pub users: UserService,
    pub inventory: InventoryService,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: AppConfig) -> Self {
        let auth = Arc::new(AuthService::new(AuthConfig {
            jwt_secret: config.jwt_secret.clone(),
            token_expiration: Duration::from_secs(config.jwt_expiration),
        }));
        Self {
            users: UserService::new(db.clone()),
            inventory: InventoryService::new(db.clone()),
            db,
            config,
            auth,
        }
    }
}

/// Builds the full application router.
///
/// `/ping`, `/health` and the credential endpoints are public; everything
/// else requires a bearer token.
pub fn app_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/ping", get(handlers::health::ping))
        .route("/health", get(handlers::health::health))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login));

    let protected = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route("/get-all-items", get(handlers::inventory::list_items))
        .route("/add-item", post(handlers::inventory::add_item))
        .route("/modify-item", post(handlers::inventory::modify_item))
        .route("/delete-item", post(handlers::inventory::delete_item))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth::auth_middleware,
        ));

    public.merge(protected).with_state(state)
}
