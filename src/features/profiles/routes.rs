use crate::features::profiles::handlers;
use crate::features::profiles::services::ProfileService;
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn routes(service: Arc<ProfileService>) -> Router {
    Router::new()
        .route("/api/profiles", get(handlers::list_profiles))
        .route(
            "/api/profiles/me",
            get(handlers::get_my_profile).patch(handlers::update_my_profile),
        )
        .route("/api/profiles/{id}", get(handlers::get_profile))
        .with_state(service)
}
