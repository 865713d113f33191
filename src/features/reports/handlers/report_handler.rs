use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{
    CreateReportDto, ReportQueryParams, ReportResponseDto, SetArchivedDto, UpdateReportDto,
};
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, DeletedDto, Meta};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// List reports
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportQueryParams),
    responses(
        (status = 200, description = "List of reports", body = ApiResponse<Vec<ReportResponseDto>>)
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn list_reports(
    State(service): State<Arc<ReportService>>,
    Query(params): Query<ReportQueryParams>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let (reports, total) = service.list(&params).await?;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get a report by id
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn get_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Create a report
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Project not found")
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn create_report(
    user: Option<AuthenticatedUser>,
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    dto.validate()?;

    let report = service.create(&dto, user.map(|u| u.user_id)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report created successfully".to_string()),
            None,
        )),
    ))
}

/// Update a report
#[utoipa::path(
    method(put, patch),
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = UpdateReportDto,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn update_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()?;

    let report = service.update(id, &dto).await?;
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Report updated successfully".to_string()),
        None,
    )))
}

/// Archive or restore a report
#[utoipa::path(
    put,
    path = "/api/reports/{id}/archived",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = SetArchivedDto,
    responses(
        (status = 200, description = "Archive flag updated", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn set_report_archived(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SetArchivedDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.set_archived(id, dto.archived).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Delete a report
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report deleted", body = ApiResponse<DeletedDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn delete_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedDto>>> {
    let id = service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        Some(DeletedDto { id }),
        Some("Report deleted successfully".to_string()),
        None,
    )))
}

/// Printable HTML preview of a report
#[utoipa::path(
    get,
    path = "/api/reports/{id}/preview",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "HTML document", content_type = "text/html", body = String),
        (status = 404, description = "Report not found")
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn preview_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>> {
    Ok(Html(service.preview(id).await?))
}
