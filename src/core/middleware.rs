use crate::core::error::AppError;
use crate::features::auth::JwtValidator;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::prelude::*;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let auth_header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok());

            if let Some(encoded) = auth_header.and_then(|h| h.strip_prefix("Basic ")) {
                if let Ok(decoded) = BASE64_STANDARD.decode(encoded) {
                    if let Ok(creds) = String::from_utf8(decoded) {
                        if creds == *credentials {
                            return Ok(next.run(req).await);
                        }
                    }
                }
            }

            let response = (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"Swagger UI\"")],
                Body::from("Unauthorized"),
            )
                .into_response();

            Err(response)
        })
    }
}

/// Bearer token check for API routes.
///
/// With no validator configured every request passes through untouched.
/// Otherwise a valid `Authorization: Bearer <jwt>` is required and the
/// decoded user is stored in the request extensions.
pub async fn auth_middleware(
    State(validator): State<Option<Arc<JwtValidator>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(validator) = validator else {
        return Ok(next.run(req).await);
    };

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let user = validator.validate_token(token)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::shared::test_helpers::sign_test_token;
    use axum::http::{HeaderName, HeaderValue};
    use axum::{routing::get, Router};
    use axum_test::TestServer;
    use std::time::Duration;

    const SECRET: &str = "test-secret-with-enough-length";

    async fn whoami(user: Option<AuthenticatedUser>) -> String {
        user.map(|u| u.user_id.to_string())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn app(validator: Option<Arc<JwtValidator>>) -> Router {
        Router::new()
            .route("/api/whoami", get(whoami))
            .route_layer(axum::middleware::from_fn_with_state(
                validator,
                auth_middleware,
            ))
    }

    fn validator() -> Arc<JwtValidator> {
        Arc::new(JwtValidator::new(
            SECRET,
            "authenticated".to_string(),
            Duration::from_secs(0),
        ))
    }

    #[tokio::test]
    async fn test_open_api_when_no_validator() {
        let server = TestServer::new(app(None)).unwrap();
        let response = server.get("/api/whoami").await;
        response.assert_status_ok();
        response.assert_text("anonymous");
    }

    #[tokio::test]
    async fn test_missing_header_rejected_when_validator_configured() {
        let server = TestServer::new(app(Some(validator()))).unwrap();
        server
            .get("/api/whoami")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_sets_user() {
        let user_id = Uuid::new_v4();
        let token = sign_test_token(SECRET, user_id, "authenticated", 3600);
        let server = TestServer::new(app(Some(validator()))).unwrap();

        let response = server
            .get("/api/whoami")
            .add_header(
                HeaderName::from_static("authorization"),
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
            )
            .await;

        response.assert_status_ok();
        response.assert_text(user_id.to_string());
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_rejected() {
        let server = TestServer::new(app(Some(validator()))).unwrap();
        server
            .get("/api/whoami")
            .add_header(
                HeaderName::from_static("authorization"),
                HeaderValue::from_static("Basic Zm9vOmJhcg=="),
            )
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
