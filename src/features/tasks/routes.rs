use crate::features::tasks::handlers;
use crate::features::tasks::services::TaskService;
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<TaskService>) -> Router {
    Router::new()
        .route("/api/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route(
            "/api/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .patch(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/api/tasks/{id}/status", put(handlers::set_task_status))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::lazy_pool;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_update_accepts_put_and_patch() {
        let server = TestServer::new(routes(Arc::new(TaskService::new(lazy_pool())))).unwrap();
        let path = format!("/api/tasks/{}", Uuid::new_v4());
        let invalid = json!({ "title": "" });

        server
            .put(&path)
            .json(&invalid)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .patch(&path)
            .json(&invalid)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
