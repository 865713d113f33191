use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Auth passthrough routes. These sit outside the bearer check.
pub fn routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/sign-in", post(handlers::sign_in))
        .route("/api/auth/sign-up", post(handlers::sign_up))
        .route("/api/auth/sign-out", post(handlers::sign_out))
        .route("/api/auth/reset-password", post(handlers::reset_password))
        .route("/api/auth/refresh", post(handlers::refresh_token))
        .route("/api/auth/session", get(handlers::get_session))
        .with_state(service)
}
