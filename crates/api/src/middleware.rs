//! Request gating: `auth_middleware` authenticates, `require_role` authorizes.
//!
//! `require_role` trusts the context inserted by `auth_middleware` and must be
//! layered inside it.

use axum::{
    extract::State,
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use garrison_auth::{AccessGate, Role};

use crate::app::errors::gate_error_to_response;
use crate::context::PrincipalContext;

/// Name of the HTTP-only cookie carrying the access token.
pub const TOKEN_COOKIE: &str = "token";

#[derive(Clone)]
pub struct AuthState {
    pub gate: AccessGate,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let principal = state
        .gate
        .authenticate(extract_token(req.headers()))
        .map_err(|e| {
            tracing::info!(
                kind = e.kind(),
                method = %req.method(),
                path = %req.uri().path(),
                "request not authenticated"
            );
            gate_error_to_response(&e)
        })?;

    req.extensions_mut().insert(PrincipalContext::new(principal));

    Ok(next.run(req).await)
}

/// Role check; the required role is the middleware state, so
/// `from_fn_with_state(Role::ADMIN, require_role)` builds an admin-only layer.
pub async fn require_role(
    State(required): State<Role>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let ctx = req.extensions().get::<PrincipalContext>();

    garrison_auth::require_role(ctx.map(PrincipalContext::principal), &required).map_err(|e| {
        tracing::info!(
            required = %required,
            actual = ?ctx.and_then(PrincipalContext::role).map(Role::as_str),
            path = %req.uri().path(),
            "role check failed"
        );
        gate_error_to_response(&e)
    })?;

    Ok(next.run(req).await)
}

/// Token from the `token` cookie, falling back to `Authorization: Bearer`.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    cookie_value(headers, TOKEN_COOKIE).or_else(|| extract_bearer(headers))
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
