use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use garrison_auth::GateError;

/// The one mapping from gate failures to responses: 401 for anything that
/// fails authentication, 403 for a role mismatch.
pub fn gate_error_to_response(err: &GateError) -> axum::response::Response {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json_error(status, err.kind(), err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use garrison_auth::{AuthFailure, Role, TokenError};

    use super::*;

    #[test]
    fn every_authentication_failure_is_401() {
        let failures = [
            AuthFailure::MissingToken,
            AuthFailure::Token(TokenError::malformed("bad")),
            AuthFailure::Token(TokenError::InvalidSignature),
            AuthFailure::Token(TokenError::TokenExpired),
        ];

        for failure in failures {
            let response = gate_error_to_response(&GateError::Unauthenticated(failure));
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn role_mismatch_is_403() {
        let response = gate_error_to_response(&GateError::Forbidden { required: Role::ADMIN });
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
