use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use gatekey_core::IdentityError;

/// Map a domain error to its one HTTP status.
///
/// `NotFound` (404) and `AccessDenied` (403) stay distinct even though
/// conflating them would leak less; the contract tests cover both.
pub fn identity_error_to_response(err: IdentityError) -> axum::response::Response {
    match err {
        IdentityError::DuplicateEmail => {
            json_error(StatusCode::BAD_REQUEST, "duplicate_email", "email already registered")
        }
        IdentityError::InvalidCredentials => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "incorrect email or password",
        ),
        IdentityError::AccountLocked => json_error(
            StatusCode::BAD_REQUEST,
            "account_locked",
            "account locked due to too many failed login attempts",
        ),
        IdentityError::InvalidToken => {
            json_error(StatusCode::BAD_REQUEST, "invalid_token", "invalid or expired token")
        }
        IdentityError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        IdentityError::AccessDenied => {
            json_error(StatusCode::FORBIDDEN, "forbidden", "operation not permitted")
        }
        IdentityError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
    }
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
