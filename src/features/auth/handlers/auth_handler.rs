use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    CurrentSessionDto, RefreshTokenRequestDto, ResetPasswordRequestDto, SessionResponseDto,
    SignInRequestDto, SignUpRequestDto, SignUpResponseDto,
};
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;
use validator::Validate;

/// Pull the raw bearer token out of the Authorization header
fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/sign-in",
    request_body = SignInRequestDto,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<SessionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn sign_in(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<SignInRequestDto>,
) -> Result<Json<ApiResponse<SessionResponseDto>>> {
    dto.validate()?;

    let session = service.sign_in(dto).await?;
    Ok(Json(ApiResponse::success(Some(session), None, None)))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/sign-up",
    request_body = SignUpRequestDto,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<SignUpResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn sign_up(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<SignUpRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<SignUpResponseDto>>)> {
    dto.validate()?;

    let response = service.sign_up(dto).await?;
    let message = response
        .confirmation_required
        .then(|| "Check your email to confirm the account".to_string());
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(response), message, None)),
    ))
}

/// Sign out the session behind the bearer token
#[utoipa::path(
    post,
    path = "/api/auth/sign-out",
    responses(
        (status = 200, description = "Signed out"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn sign_out(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<()>>> {
    let token = bearer_token(&headers)?;
    service.sign_out(token).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Signed out".to_string()),
        None,
    )))
}

/// Send a password recovery email
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequestDto,
    responses(
        (status = 200, description = "Recovery email requested"),
        (status = 400, description = "Validation error")
    ),
    tag = "auth"
)]
pub async fn reset_password(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<ResetPasswordRequestDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()?;

    service.reset_password(dto).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("If the address exists, a recovery email has been sent".to_string()),
        None,
    )))
}

/// Refresh an expired access token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequestDto,
    responses(
        (status = 200, description = "Token refreshed", body = ApiResponse<SessionResponseDto>),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RefreshTokenRequestDto>,
) -> Result<Json<ApiResponse<SessionResponseDto>>> {
    dto.validate()?;

    let session = service.refresh(dto).await?;
    Ok(Json(ApiResponse::success(Some(session), None, None)))
}

/// Current session user and profile
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Current session", body = ApiResponse<CurrentSessionDto>),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn get_session(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<CurrentSessionDto>>> {
    let token = bearer_token(&headers)?;
    let session = service.current_session(token).await?;
    Ok(Json(ApiResponse::success(Some(session), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def");

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_err());
    }
}
