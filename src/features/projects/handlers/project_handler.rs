use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::projects::dtos::{
    AddCollaboratorDto, CollaboratorResponseDto, CreateProjectDto, ProjectQueryParams,
    ProjectResponseDto, ProjectTimelineResponseDto, UpdateProjectDto,
};
use crate::features::projects::models::ProjectStatusCounts;
use crate::features::projects::services::ProjectService;
use crate::features::projects::timeline::ProjectTimeline;
use crate::shared::types::{ApiResponse, DeletedDto, Meta};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// List projects
#[utoipa::path(
    get,
    path = "/api/projects",
    params(ProjectQueryParams),
    responses(
        (status = 200, description = "List of projects", body = ApiResponse<Vec<ProjectResponseDto>>)
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn list_projects(
    State(service): State<Arc<ProjectService>>,
    Query(params): Query<ProjectQueryParams>,
) -> Result<Json<ApiResponse<Vec<ProjectResponseDto>>>> {
    let (projects, total) = service.list(&params).await?;
    let today = Utc::now().date_naive();
    let dtos: Vec<ProjectResponseDto> = projects
        .into_iter()
        .map(|p| ProjectResponseDto::from_project(p, today))
        .collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Project counts per status tab
#[utoipa::path(
    get,
    path = "/api/projects/summary",
    responses(
        (status = 200, description = "Counts per status tab", body = ApiResponse<ProjectStatusCounts>)
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn get_project_summary(
    State(service): State<Arc<ProjectService>>,
) -> Result<Json<ApiResponse<ProjectStatusCounts>>> {
    let counts = service.summary().await?;
    Ok(Json(ApiResponse::success(Some(counts), None, None)))
}

/// Get a project by id
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project found", body = ApiResponse<ProjectResponseDto>),
        (status = 404, description = "Project not found")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn get_project(
    State(service): State<Arc<ProjectService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProjectResponseDto>>> {
    let project = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(project.into()), None, None)))
}

/// Create a project
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectDto,
    responses(
        (status = 201, description = "Project created", body = ApiResponse<ProjectResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn create_project(
    user: Option<AuthenticatedUser>,
    State(service): State<Arc<ProjectService>>,
    AppJson(dto): AppJson<CreateProjectDto>,
) -> Result<(StatusCode, Json<ApiResponse<ProjectResponseDto>>)> {
    dto.validate()?;

    let project = service.create(&dto, user.map(|u| u.user_id)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(project.into()),
            Some("Project created successfully".to_string()),
            None,
        )),
    ))
}

/// Update a project
#[utoipa::path(
    method(put, patch),
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    request_body = UpdateProjectDto,
    responses(
        (status = 200, description = "Project updated", body = ApiResponse<ProjectResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Project not found")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn update_project(
    State(service): State<Arc<ProjectService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateProjectDto>,
) -> Result<Json<ApiResponse<ProjectResponseDto>>> {
    dto.validate()?;

    let project = service.update(id, &dto).await?;
    Ok(Json(ApiResponse::success(
        Some(project.into()),
        Some("Project updated successfully".to_string()),
        None,
    )))
}

/// Delete a project
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project deleted", body = ApiResponse<DeletedDto>),
        (status = 404, description = "Project not found")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn delete_project(
    State(service): State<Arc<ProjectService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedDto>>> {
    let id = service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        Some(DeletedDto { id }),
        Some("Project deleted successfully".to_string()),
        None,
    )))
}

/// Schedule progress of a project
#[utoipa::path(
    get,
    path = "/api/projects/{id}/timeline",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project timeline", body = ApiResponse<ProjectTimelineResponseDto>),
        (status = 404, description = "Project not found")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn get_project_timeline(
    State(service): State<Arc<ProjectService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProjectTimelineResponseDto>>> {
    let project = service.get_by_id(id).await?;
    let timeline =
        ProjectTimeline::compute(project.start_date, project.end_date, Utc::now().date_naive());

    Ok(Json(ApiResponse::success(
        Some(ProjectTimelineResponseDto {
            project_id: project.id,
            start_date: project.start_date,
            end_date: project.end_date,
            timeline,
        }),
        None,
        None,
    )))
}

/// List collaborators on a project
#[utoipa::path(
    get,
    path = "/api/projects/{id}/collaborators",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Collaborators", body = ApiResponse<Vec<CollaboratorResponseDto>>),
        (status = 404, description = "Project not found")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn list_collaborators(
    State(service): State<Arc<ProjectService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<CollaboratorResponseDto>>>> {
    let collaborators = service.list_collaborators(id).await?;
    let total = collaborators.len() as i64;
    let dtos: Vec<CollaboratorResponseDto> = collaborators.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Add a collaborator to a project
#[utoipa::path(
    post,
    path = "/api/projects/{id}/collaborators",
    params(("id" = Uuid, Path, description = "Project ID")),
    request_body = AddCollaboratorDto,
    responses(
        (status = 201, description = "Collaborator added", body = ApiResponse<CollaboratorResponseDto>),
        (status = 404, description = "Project or profile not found"),
        (status = 409, description = "Already a collaborator")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn add_collaborator(
    State(service): State<Arc<ProjectService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AddCollaboratorDto>,
) -> Result<(StatusCode, Json<ApiResponse<CollaboratorResponseDto>>)> {
    dto.validate()?;

    let collaborator = service.add_collaborator(id, &dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(collaborator.into()), None, None)),
    ))
}

/// Remove a collaborator from a project
#[utoipa::path(
    delete,
    path = "/api/projects/{id}/collaborators/{profile_id}",
    params(
        ("id" = Uuid, Path, description = "Project ID"),
        ("profile_id" = Uuid, Path, description = "Collaborator profile ID")
    ),
    responses(
        (status = 200, description = "Collaborator removed"),
        (status = 404, description = "Not a collaborator")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn remove_collaborator(
    State(service): State<Arc<ProjectService>>,
    Path((id, profile_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>> {
    service.remove_collaborator(id, profile_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Collaborator removed".to_string()),
        None,
    )))
}
