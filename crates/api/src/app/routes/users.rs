//! Profile endpoints: `/users/me`, by-id CRUD and professional status.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};

use gatekey_core::AccountId;
use gatekey_identity::ProfilePatch;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/users/", get(list_users).post(create_user))
        .route("/users/me", get(get_me).patch(update_me))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/:id/professional", patch(set_professional_status))
}

pub async fn get_me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.profiles.get_self(principal.actor()) {
        Ok(account) => (StatusCode::OK, Json(dto::account_to_json(&account))).into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}

pub async fn update_me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(patch): Json<ProfilePatch>,
) -> axum::response::Response {
    match services.profiles.update_self(principal.actor(), patch) {
        Ok(account) => (StatusCode::OK, Json(dto::account_to_json(&account))).into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}

pub async fn set_professional_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::ProfessionalStatusRequest>,
) -> axum::response::Response {
    let target: AccountId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid account id");
        }
    };

    match services.profiles.set_professional_status(
        principal.actor(),
        target,
        body.is_professional,
    ) {
        Ok(account) => (StatusCode::OK, Json(dto::account_to_json(&account))).into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let target: AccountId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid account id");
        }
    };

    match services.profiles.get_by_id(principal.actor(), target) {
        Ok(account) => (StatusCode::OK, Json(dto::account_to_json(&account))).into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(patch): Json<ProfilePatch>,
) -> axum::response::Response {
    let target: AccountId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid account id");
        }
    };

    match services.profiles.update_by_id(principal.actor(), target, patch) {
        Ok(account) => (StatusCode::OK, Json(dto::account_to_json(&account))).into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let target: AccountId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid account id");
        }
    };

    match services.profiles.delete(principal.actor(), target) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    match services
        .profiles
        .create(principal.actor(), &body.email, &body.password, body.role)
    {
        Ok(account) => {
            (StatusCode::CREATED, Json(dto::account_to_json(&account))).into_response()
        }
        Err(e) => errors::identity_error_to_response(e),
    }
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    match services
        .profiles
        .list(principal.actor(), query.skip, query.limit)
    {
        Ok((accounts, total)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "items": accounts.iter().map(dto::account_to_json).collect::<Vec<_>>(),
                "total": total,
                "skip": query.skip,
                "limit": query.limit,
            })),
        )
            .into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}
