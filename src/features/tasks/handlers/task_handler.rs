use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::tasks::dtos::{
    CreateTaskDto, SetTaskStatusDto, TaskQueryParams, TaskResponseDto, UpdateTaskDto,
};
use crate::features::tasks::services::TaskService;
use crate::shared::types::{ApiResponse, DeletedDto, Meta};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// List tasks
#[utoipa::path(
    get,
    path = "/api/tasks",
    params(TaskQueryParams),
    responses(
        (status = 200, description = "Tasks by priority, then due date", body = ApiResponse<Vec<TaskResponseDto>>)
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn list_tasks(
    State(service): State<Arc<TaskService>>,
    Query(params): Query<TaskQueryParams>,
) -> Result<Json<ApiResponse<Vec<TaskResponseDto>>>> {
    let (tasks, total) = service.list(&params).await?;
    let dtos: Vec<TaskResponseDto> = tasks.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get a task by id
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = ApiResponse<TaskResponseDto>),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn get_task(
    State(service): State<Arc<TaskService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TaskResponseDto>>> {
    let task = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(task.into()), None, None)))
}

/// Create a task
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskDto,
    responses(
        (status = 201, description = "Task created", body = ApiResponse<TaskResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn create_task(
    user: Option<AuthenticatedUser>,
    State(service): State<Arc<TaskService>>,
    AppJson(dto): AppJson<CreateTaskDto>,
) -> Result<(StatusCode, Json<ApiResponse<TaskResponseDto>>)> {
    dto.validate()?;

    let task = service.create(&dto, user.map(|u| u.user_id)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(task.into()),
            Some("Task created successfully".to_string()),
            None,
        )),
    ))
}

/// Update a task
#[utoipa::path(
    method(put, patch),
    path = "/api/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = UpdateTaskDto,
    responses(
        (status = 200, description = "Task updated", body = ApiResponse<TaskResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn update_task(
    State(service): State<Arc<TaskService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateTaskDto>,
) -> Result<Json<ApiResponse<TaskResponseDto>>> {
    dto.validate()?;

    let task = service.update(id, &dto).await?;
    Ok(Json(ApiResponse::success(Some(task.into()), None, None)))
}

/// Complete or reopen a task
#[utoipa::path(
    put,
    path = "/api/tasks/{id}/status",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = SetTaskStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<TaskResponseDto>),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn set_task_status(
    State(service): State<Arc<TaskService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SetTaskStatusDto>,
) -> Result<Json<ApiResponse<TaskResponseDto>>> {
    let task = service.set_status(id, dto.status).await?;
    Ok(Json(ApiResponse::success(Some(task.into()), None, None)))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted", body = ApiResponse<DeletedDto>),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn delete_task(
    State(service): State<Arc<TaskService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedDto>>> {
    let id = service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        Some(DeletedDto { id }),
        Some("Task deleted successfully".to_string()),
        None,
    )))
}
