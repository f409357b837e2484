//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: codec, credential verifier and cookie settings
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use garrison_auth::{AccessGate, Role, TokenCodec};

use crate::config::ApiConfig;
use crate::credentials::CredentialVerifier;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig, credentials: Arc<dyn CredentialVerifier>) -> Router {
    let codec = Arc::new(TokenCodec::new(config.jwt_secret.clone()));
    let auth_state = middleware::AuthState {
        gate: AccessGate::new(codec.clone()),
    };

    let services = Arc::new(services::build_services(config, codec, credentials));

    // Admin-only routes: role check runs inside authentication.
    let admin = Router::new()
        .route("/api/auth/admin", get(routes::auth::admin))
        .route_layer(from_fn_with_state(Role::ADMIN, middleware::require_role));

    // Protected routes: require a valid token.
    let protected = Router::new()
        .route("/api/auth/whoami", get(routes::system::whoami))
        .merge(admin)
        .route_layer(from_fn_with_state(auth_state, middleware::auth_middleware));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/logout", post(routes::auth::logout))
        .merge(protected)
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
