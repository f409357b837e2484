//! Access gate: authentication (who is this) and role authorization.
//!
//! Transport-agnostic; the HTTP layer extracts the raw token and maps
//! [`GateError`] to a response.

use std::sync::Arc;

use thiserror::Error;

use crate::{Principal, Role, TokenCodec, TokenError};

/// Why authentication failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("no token provided")]
    MissingToken,

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl AuthFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            AuthFailure::MissingToken => "missing_token",
            AuthFailure::Token(e) => e.kind(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// No token, or the token failed verification.
    #[error("not authenticated: {0}")]
    Unauthenticated(AuthFailure),

    /// Authenticated, but the principal does not hold the required role.
    #[error("forbidden: role '{required}' required")]
    Forbidden { required: Role },
}

impl GateError {
    /// Outward status code. Authentication failures are always 401 and role
    /// mismatches always 403, whatever the underlying cause.
    pub fn status_code(&self) -> u16 {
        match self {
            GateError::Unauthenticated(_) => 401,
            GateError::Forbidden { .. } => 403,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GateError::Unauthenticated(failure) => failure.kind(),
            GateError::Forbidden { .. } => "forbidden",
        }
    }
}

/// Authenticates raw tokens against a shared codec.
#[derive(Debug, Clone)]
pub struct AccessGate {
    codec: Arc<TokenCodec>,
}

impl AccessGate {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Verify the token carried by a request, if any.
    pub fn authenticate(&self, token: Option<&str>) -> Result<Principal, GateError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(GateError::Unauthenticated(AuthFailure::MissingToken))?;

        let claims = self
            .codec
            .decode(token)
            .map_err(|e| GateError::Unauthenticated(e.into()))?;

        Ok(Principal::from_claims(claims))
    }
}

/// Require the principal to hold exactly `required`.
///
/// - No IO, no token decoding
/// - Case-sensitive, no role hierarchy
/// - A missing principal is forbidden, not unauthenticated
pub fn require_role(principal: Option<&Principal>, required: &Role) -> Result<(), GateError> {
    match principal.and_then(Principal::role) {
        Some(role) if role == required => Ok(()),
        _ => Err(GateError::Forbidden {
            required: required.clone(),
        }),
    }
}
