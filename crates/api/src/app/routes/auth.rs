//! Registration, login and email-verification endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use gatekey_core::{AccountId, IdentityError};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    let role = body.role.unwrap_or(gatekey_auth::Role::Authenticated);

    match services.auth.register(&body.email, &body.password, role) {
        Ok(account) => {
            (StatusCode::CREATED, Json(dto::account_to_json(&account))).into_response()
        }
        // Do not echo whether the address was already registered.
        Err(IdentityError::DuplicateEmail) => errors::json_error(
            StatusCode::BAD_REQUEST,
            "registration_failed",
            "registration could not be completed",
        ),
        Err(e) => errors::identity_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services.auth.login(&body.email, &body.password) {
        Ok(issued) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "access_token": issued.token,
                "token_type": "bearer",
                "expires_at": issued.claims.expires_at.to_rfc3339(),
            })),
        )
            .into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}

pub async fn verify_email(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, token)): Path<(String, String)>,
) -> axum::response::Response {
    let account_id: AccountId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid account id");
        }
    };

    match services.auth.verify_email(account_id, &token) {
        Ok(account) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "email verified",
                "user": dto::account_to_json(&account),
            })),
        )
            .into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}
