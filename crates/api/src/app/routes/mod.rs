use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod system;
pub mod users;

/// Router for the unauthenticated endpoints (registration, login, email
/// verification).
pub fn public_router() -> Router {
    Router::new()
        .route("/register/", post(auth::register))
        .route("/login/", post(auth::login))
        .route("/verify-email/:id/:token", get(auth::verify_email))
}

/// Router for all bearer-protected endpoints.
pub fn protected_router() -> Router {
    // `users::router()` uses absolute paths so `/users/` (trailing slash)
    // resolves exactly as published.
    Router::new().merge(users::router())
}
