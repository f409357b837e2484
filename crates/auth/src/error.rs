//! Token codec error model.

use thiserror::Error;

/// Failure surfaced by the token codec.
///
/// Every decode failure is one of these; the codec never substitutes a
/// default claim set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The time-to-live string is not `<integer><unit>` with a known unit.
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// Wrong segment count, bad base64, or a payload that is not a claim object.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The signature does not match the header and payload.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The `exp` claim lies in the past.
    #[error("token has expired")]
    TokenExpired,
}

impl TokenError {
    pub fn invalid_duration(msg: impl Into<String>) -> Self {
        Self::InvalidDuration(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedToken(msg.into())
    }

    /// Stable machine-readable code for this failure.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::InvalidDuration(_) => "invalid_duration",
            TokenError::MalformedToken(_) => "malformed_token",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::TokenExpired => "token_expired",
        }
    }
}
