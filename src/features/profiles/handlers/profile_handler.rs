use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::profiles::dtos::{ProfileQueryParams, ProfileResponseDto, UpdateProfileDto};
use crate::features::profiles::services::ProfileService;
use crate::shared::types::{ApiResponse, Meta};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// List profiles
#[utoipa::path(
    get,
    path = "/api/profiles",
    params(ProfileQueryParams),
    responses(
        (status = 200, description = "List of profiles", body = ApiResponse<Vec<ProfileResponseDto>>),
        (status = 400, description = "Unknown role filter")
    ),
    tag = "profiles",
    security(("bearer_auth" = []))
)]
pub async fn list_profiles(
    State(service): State<Arc<ProfileService>>,
    Query(params): Query<ProfileQueryParams>,
) -> Result<Json<ApiResponse<Vec<ProfileResponseDto>>>> {
    params.validate()?;

    let profiles = service.list(&params).await?;
    let total = profiles.len() as i64;
    let dtos: Vec<ProfileResponseDto> = profiles.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get a profile by id
#[utoipa::path(
    get,
    path = "/api/profiles/{id}",
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile found", body = ApiResponse<ProfileResponseDto>),
        (status = 404, description = "Profile not found")
    ),
    tag = "profiles",
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    State(service): State<Arc<ProfileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProfileResponseDto>>> {
    let profile = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(profile.into()), None, None)))
}

/// Profile of the authenticated caller
#[utoipa::path(
    get,
    path = "/api/profiles/me",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<ProfileResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No profile for this user")
    ),
    tag = "profiles",
    security(("bearer_auth" = []))
)]
pub async fn get_my_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<ProfileService>>,
) -> Result<Json<ApiResponse<ProfileResponseDto>>> {
    let profile = service.get_by_id(user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(profile.into()), None, None)))
}

/// Update the caller's profile
#[utoipa::path(
    patch,
    path = "/api/profiles/me",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated successfully", body = ApiResponse<ProfileResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "profiles",
    security(("bearer_auth" = []))
)]
pub async fn update_my_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<ProfileService>>,
    AppJson(dto): AppJson<UpdateProfileDto>,
) -> Result<Json<ApiResponse<ProfileResponseDto>>> {
    dto.validate()?;

    let profile = service.update(user.user_id, &dto).await?;
    Ok(Json(ApiResponse::success(
        Some(profile.into()),
        Some("Profile updated successfully".to_string()),
        None,
    )))
}
