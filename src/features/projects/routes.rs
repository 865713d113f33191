use crate::features::projects::handlers;
use crate::features::projects::services::ProjectService;
use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<ProjectService>) -> Router {
    Router::new()
        .route(
            "/api/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route("/api/projects/summary", get(handlers::get_project_summary))
        .route(
            "/api/projects/{id}",
            get(handlers::get_project)
                .put(handlers::update_project)
                .patch(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route(
            "/api/projects/{id}/timeline",
            get(handlers::get_project_timeline),
        )
        .route(
            "/api/projects/{id}/collaborators",
            get(handlers::list_collaborators).post(handlers::add_collaborator),
        )
        .route(
            "/api/projects/{id}/collaborators/{profile_id}",
            delete(handlers::remove_collaborator),
        )
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

    fn server() -> TestServer {
        let service = Arc::new(ProjectService::new(lazy_pool()));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_update_accepts_put_and_patch() {
        let server = server();
        let path = format!("/api/projects/{}", Uuid::new_v4());
        let invalid = json!({ "name": "   " });

        // Both verbs reach the handler, which rejects the blank name
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
