//! Request/response DTOs.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/login`. Fields are optional so a missing one maps
/// to a validation error instead of a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WhoAmIResponse {
    pub id: Option<String>,
    pub role: Option<String>,
    pub exp: Option<i64>,
}
