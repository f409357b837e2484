use axum::{Extension, Json, http::StatusCode};

use crate::app::dto::WhoAmIResponse;
use crate::context::PrincipalContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        id: principal.id().map(str::to_string),
        role: principal.role().map(|r| r.as_str().to_string()),
        exp: principal.principal().expires_at(),
    })
}
