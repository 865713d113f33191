use axum::{
    extract::{multipart::Field, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::photos::dtos::{
    is_mime_type_allowed, normalize_tags, AddPhotoTaskDto, CreatePhotoDto, PhotoQueryParams,
    PhotoResponseDto, PhotoSectionDto, PhotoUpload, UpdatePhotoDto, UpdatePhotoTaskDto,
    UploadPhotoDto, ALLOWED_MIME_TYPES, MAX_PHOTO_SIZE,
};
use crate::features::photos::models::PhotoTask;
use crate::features::photos::services::PhotoService;
use crate::shared::types::{ApiResponse, DeletedDto, Meta};

/// List photos
#[utoipa::path(
    get,
    path = "/api/photos",
    params(PhotoQueryParams),
    responses(
        (status = 200, description = "List of photos", body = ApiResponse<Vec<PhotoResponseDto>>),
        (status = 400, description = "Invalid date range")
    ),
    tag = "photos",
    security(("bearer_auth" = []))
)]
pub async fn list_photos(
    State(service): State<Arc<PhotoService>>,
    Query(params): Query<PhotoQueryParams>,
) -> Result<Json<ApiResponse<Vec<PhotoResponseDto>>>> {
    let (photos, total) = service.list(&params).await?;
    let dtos: Vec<PhotoResponseDto> = photos.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Photos grouped into date sections
#[utoipa::path(
    get,
    path = "/api/photos/grouped",
    params(PhotoQueryParams),
    responses(
        (status = 200, description = "Date sections, undated last", body = ApiResponse<Vec<PhotoSectionDto>>),
        (status = 400, description = "Invalid date range")
    ),
    tag = "photos",
    security(("bearer_auth" = []))
)]
pub async fn list_photos_grouped(
    State(service): State<Arc<PhotoService>>,
    Query(params): Query<PhotoQueryParams>,
) -> Result<Json<ApiResponse<Vec<PhotoSectionDto>>>> {
    let sections = service.grouped(&params).await?;
    let total = sections.iter().map(|s| s.count as i64).sum();
    Ok(Json(ApiResponse::success(
        Some(sections),
        None,
        Some(Meta { total }),
    )))
}

/// Get a photo by id
#[utoipa::path(
    get,
    path = "/api/photos/{id}",
    params(("id" = Uuid, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Photo found", body = ApiResponse<PhotoResponseDto>),
        (status = 404, description = "Photo not found")
    ),
    tag = "photos",
    security(("bearer_auth" = []))
)]
pub async fn get_photo(
    State(service): State<Arc<PhotoService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PhotoResponseDto>>> {
    let photo = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(photo.into()), None, None)))
}

/// Register a photo from an existing URL
#[utoipa::path(
    post,
    path = "/api/photos",
    request_body = CreatePhotoDto,
    responses(
        (status = 201, description = "Photo created", body = ApiResponse<PhotoResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "photos",
    security(("bearer_auth" = []))
)]
pub async fn create_photo(
    user: Option<AuthenticatedUser>,
    State(service): State<Arc<PhotoService>>,
    AppJson(dto): AppJson<CreatePhotoDto>,
) -> Result<(StatusCode, Json<ApiResponse<PhotoResponseDto>>)> {
    dto.validate()?;

    let photo = service.create(&dto, user.map(|u| u.user_id)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(photo.into()), None, None)),
    ))
}

async fn read_text(field: Field<'_>, name: &str) -> Result<Option<String>> {
    let text = field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read {} field: {}", name, e)))?;
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

fn parse_field<T: std::str::FromStr>(value: Option<String>, name: &str) -> Result<Option<T>> {
    value
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| AppError::BadRequest(format!("Invalid {}: {}", name, v)))
        })
        .transpose()
}

/// Upload an image
///
/// Accepts multipart/form-data with:
/// - `file`: the image (required)
/// - `project_id`, `caption`, `taken_on` (YYYY-MM-DD), `tags` (comma-separated),
///   `assignee`, `group_name`: optional metadata
#[utoipa::path(
    post,
    path = "/api/photos/upload",
    request_body(
        content = UploadPhotoDto,
        content_type = "multipart/form-data",
        description = "Image file plus optional photo metadata",
    ),
    responses(
        (status = 201, description = "Photo uploaded", body = ApiResponse<PhotoResponseDto>),
        (status = 400, description = "Invalid file or metadata"),
        (status = 413, description = "File too large")
    ),
    tag = "photos",
    security(("bearer_auth" = []))
)]
pub async fn upload_photo(
    user: Option<AuthenticatedUser>,
    State(service): State<Arc<PhotoService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<PhotoResponseDto>>)> {
    let mut file: Option<(Vec<u8>, String)> = None;
    let mut upload = PhotoUpload::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;
                file = Some((data.to_vec(), content_type));
            }
            "project_id" => {
                let raw = read_text(field, "project_id").await?;
                upload.project_id = parse_field::<Uuid>(raw, "project_id")?;
            }
            "taken_on" => {
                let raw = read_text(field, "taken_on").await?;
                upload.taken_on = parse_field::<NaiveDate>(raw, "taken_on")?;
            }
            "caption" => upload.caption = read_text(field, "caption").await?,
            "tags" => {
                upload.tags = read_text(field, "tags")
                    .await?
                    .map(|raw| normalize_tags(raw.split(',')))
                    .unwrap_or_default();
            }
            "assignee" => upload.assignee = read_text(field, "assignee").await?,
            "group_name" | "group" => upload.group_name = read_text(field, "group_name").await?,
            _ => debug!("Ignoring unknown field: {}", field_name),
        }
    }

    let (data, content_type) =
        file.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    if data.is_empty() {
        return Err(AppError::BadRequest("File is empty".to_string()));
    }

    if data.len() > MAX_PHOTO_SIZE {
        return Err(AppError::BadRequest(format!(
            "File too large. Maximum size is {} MB",
            MAX_PHOTO_SIZE / 1024 / 1024
        )));
    }

    if !is_mime_type_allowed(&content_type) {
        return Err(AppError::BadRequest(format!(
            "File type '{}' is not allowed. Allowed types: {}",
            content_type,
            ALLOWED_MIME_TYPES.join(", ")
        )));
    }

    let photo = service
        .upload(data, &content_type, &upload, user.map(|u| u.user_id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(photo.into()), None, None)),
    ))
}

/// Update photo metadata
#[utoipa::path(
    patch,
    path = "/api/photos/{id}",
    params(("id" = Uuid, Path, description = "Photo ID")),
    request_body = UpdatePhotoDto,
    responses(
        (status = 200, description = "Photo updated", body = ApiResponse<PhotoResponseDto>),
        (status = 404, description = "Photo not found")
    ),
    tag = "photos",
    security(("bearer_auth" = []))
)]
pub async fn update_photo(
    State(service): State<Arc<PhotoService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdatePhotoDto>,
) -> Result<Json<ApiResponse<PhotoResponseDto>>> {
    dto.validate()?;

    let photo = service.update(id, &dto).await?;
    Ok(Json(ApiResponse::success(Some(photo.into()), None, None)))
}

/// Delete a photo and its stored image
#[utoipa::path(
    delete,
    path = "/api/photos/{id}",
    params(("id" = Uuid, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Photo deleted", body = ApiResponse<DeletedDto>),
        (status = 404, description = "Photo not found")
    ),
    tag = "photos",
    security(("bearer_auth" = []))
)]
pub async fn delete_photo(
    State(service): State<Arc<PhotoService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedDto>>> {
    let id = service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        Some(DeletedDto { id }),
        Some("Photo deleted successfully".to_string()),
        None,
    )))
}

/// Add a task to a photo
#[utoipa::path(
    post,
    path = "/api/photos/{id}/tasks",
    params(("id" = Uuid, Path, description = "Photo ID")),
    request_body = AddPhotoTaskDto,
    responses(
        (status = 201, description = "Task added", body = ApiResponse<PhotoTask>),
        (status = 404, description = "Photo not found")
    ),
    tag = "photos",
    security(("bearer_auth" = []))
)]
pub async fn add_photo_task(
    State(service): State<Arc<PhotoService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AddPhotoTaskDto>,
) -> Result<(StatusCode, Json<ApiResponse<PhotoTask>>)> {
    dto.validate()?;

    let task = service.add_task(id, &dto.title).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(task), None, None)),
    ))
}

/// Rename or (un)complete a photo task
#[utoipa::path(
    patch,
    path = "/api/photos/{id}/tasks/{task_id}",
    params(
        ("id" = Uuid, Path, description = "Photo ID"),
        ("task_id" = Uuid, Path, description = "Task ID")
    ),
    request_body = UpdatePhotoTaskDto,
    responses(
        (status = 200, description = "Task updated", body = ApiResponse<PhotoTask>),
        (status = 404, description = "Photo or task not found")
    ),
    tag = "photos",
    security(("bearer_auth" = []))
)]
pub async fn update_photo_task(
    State(service): State<Arc<PhotoService>>,
    Path((id, task_id)): Path<(Uuid, Uuid)>,
    AppJson(dto): AppJson<UpdatePhotoTaskDto>,
) -> Result<Json<ApiResponse<PhotoTask>>> {
    dto.validate()?;

    let task = service.update_task(id, task_id, &dto).await?;
    Ok(Json(ApiResponse::success(Some(task), None, None)))
}

/// Remove a photo task
#[utoipa::path(
    delete,
    path = "/api/photos/{id}/tasks/{task_id}",
    params(
        ("id" = Uuid, Path, description = "Photo ID"),
        ("task_id" = Uuid, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Remaining tasks", body = ApiResponse<Vec<PhotoTask>>),
        (status = 404, description = "Photo or task not found")
    ),
    tag = "photos",
    security(("bearer_auth" = []))
)]
pub async fn remove_photo_task(
    State(service): State<Arc<PhotoService>>,
    Path((id, task_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<Vec<PhotoTask>>>> {
    let tasks = service.remove_task(id, task_id).await?;
    Ok(Json(ApiResponse::success(Some(tasks), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        let id = Uuid::new_v4();
        assert_eq!(parse_field::<Uuid>(Some(id.to_string()), "project_id").unwrap(), Some(id));
        assert_eq!(parse_field::<Uuid>(None, "project_id").unwrap(), None);
        assert!(parse_field::<NaiveDate>(Some("05/03/2024".to_string()), "taken_on").is_err());
        assert_eq!(
            parse_field::<NaiveDate>(Some("2024-03-05".to_string()), "taken_on").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
    }
}
