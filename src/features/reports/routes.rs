use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route(
            "/api/reports/{id}",
            get(handlers::get_report)
                .put(handlers::update_report)
                .patch(handlers::update_report)
                .delete(handlers::delete_report),
        )
        .route(
            "/api/reports/{id}/archived",
            put(handlers::set_report_archived),
        )
        .route("/api/reports/{id}/preview", get(handlers::preview_report))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::projects::ProjectService;
    use crate::shared::test_helpers::lazy_pool;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_update_accepts_put_and_patch() {
        let pool = lazy_pool();
        let projects = Arc::new(ProjectService::new(pool.clone()));
        let server = TestServer::new(routes(Arc::new(ReportService::new(pool, projects)))).unwrap();
        let path = format!("/api/reports/{}", Uuid::new_v4());
        let invalid = json!({ "content": ["not", "an", "object"] });

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
