use crate::features::photos::handlers;
use crate::features::photos::services::PhotoService;
use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<PhotoService>) -> Router {
    Router::new()
        .route(
            "/api/photos",
            get(handlers::list_photos).post(handlers::create_photo),
        )
        .route("/api/photos/grouped", get(handlers::list_photos_grouped))
        .route("/api/photos/upload", post(handlers::upload_photo))
        .route(
            "/api/photos/{id}",
            get(handlers::get_photo)
                .patch(handlers::update_photo)
                .delete(handlers::delete_photo),
        )
        .route("/api/photos/{id}/tasks", post(handlers::add_photo_task))
        .route(
            "/api/photos/{id}/tasks/{task_id}",
            patch(handlers::update_photo_task).delete(handlers::remove_photo_task),
        )
        .with_state(service)
}
