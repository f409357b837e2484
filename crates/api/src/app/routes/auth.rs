//! Login/logout and the admin-only probe route.

use std::sync::Arc;

use axum::{
    Extension, Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use garrison_auth::{ClaimSet, claims};

use crate::app::dto::{LoginRequest, MessageResponse};
use crate::app::errors::json_error;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// POST /api/auth/login - verify credentials, mint a token, set the cookie
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(req): Json<LoginRequest>,
) -> Response {
    let username = req.username.filter(|u| !u.trim().is_empty());
    let password = req.password.filter(|p| !p.is_empty());
    let (Some(username), Some(password)) = (username, password) else {
        return json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "username and password are required",
        );
    };

    let Some(user) = services.credentials.verify(&username, &password) else {
        tracing::warn!(%username, "login rejected");
        return json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", "Invalid credentials");
    };

    let claims = ClaimSet::new()
        .with(claims::ID, user.id.clone())
        .with(claims::ROLE, user.role.as_str().to_string());

    let token = match services.codec.encode_for(&claims, services.token_ttl) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "failed to mint token");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "token_error", e.to_string());
        }
    };

    let cookie = match HeaderValue::from_str(&services.session_cookie(&token)) {
        Ok(cookie) => cookie,
        Err(e) => {
            tracing::error!(error = %e, "token is not a valid cookie value");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "token_error", "failed to set session cookie");
        }
    };

    tracing::info!(%username, id = %user.id, role = %user.role, "logged in");

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::new("Logged in successfully")),
    )
        .into_response()
}

/// POST /api/auth/logout - drop the session cookie
///
/// Tokens are stateless; one already copied elsewhere stays valid until `exp`.
pub async fn logout(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let cookie = services.cleared_cookie();
    match HeaderValue::from_str(&cookie) {
        Ok(cookie) => (
            StatusCode::OK,
            [(header::SET_COOKIE, cookie)],
            Json(MessageResponse::new("Logged out successfully")),
        )
            .into_response(),
        Err(_) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "cookie_error", "failed to clear session cookie"),
    }
}

/// GET /api/auth/admin - reachable only through authenticate + require_role("admin")
pub async fn admin(Extension(principal): Extension<PrincipalContext>) -> Json<MessageResponse> {
    tracing::debug!(id = ?principal.id(), "admin access");
    Json(MessageResponse::new("Admin access granted"))
}
