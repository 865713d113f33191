use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::photos::{
    dtos as photos_dtos, handlers as photos_handlers, models as photos_models,
};
use crate::features::profiles::{dtos as profiles_dtos, handlers as profiles_handlers};
use crate::features::projects::{
    dtos as projects_dtos, handlers as projects_handlers, models as projects_models,
    timeline::ProjectTimeline,
};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::tasks::{
    dtos as tasks_dtos, handlers as tasks_handlers, models as tasks_models,
};
use crate::shared::types::{ApiResponse, DeletedDto, Meta, SortDirection};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::sign_in,
        auth_handlers::sign_up,
        auth_handlers::sign_out,
        auth_handlers::reset_password,
        auth_handlers::refresh_token,
        auth_handlers::get_session,
        // Profiles
        profiles_handlers::list_profiles,
        profiles_handlers::get_profile,
        profiles_handlers::get_my_profile,
        profiles_handlers::update_my_profile,
        // Projects
        projects_handlers::list_projects,
        projects_handlers::get_project_summary,
        projects_handlers::get_project,
        projects_handlers::create_project,
        projects_handlers::update_project,
        projects_handlers::delete_project,
        projects_handlers::get_project_timeline,
        projects_handlers::list_collaborators,
        projects_handlers::add_collaborator,
        projects_handlers::remove_collaborator,
        // Reports
        reports_handlers::list_reports,
        reports_handlers::get_report,
        reports_handlers::create_report,
        reports_handlers::update_report,
        reports_handlers::set_report_archived,
        reports_handlers::delete_report,
        reports_handlers::preview_report,
        // Photos
        photos_handlers::list_photos,
        photos_handlers::list_photos_grouped,
        photos_handlers::get_photo,
        photos_handlers::create_photo,
        photos_handlers::upload_photo,
        photos_handlers::update_photo,
        photos_handlers::delete_photo,
        photos_handlers::add_photo_task,
        photos_handlers::update_photo_task,
        photos_handlers::remove_photo_task,
        // Tasks
        tasks_handlers::list_tasks,
        tasks_handlers::get_task,
        tasks_handlers::create_task,
        tasks_handlers::update_task,
        tasks_handlers::set_task_status,
        tasks_handlers::delete_task,
    ),
    components(
        schemas(
            // Shared
            Meta,
            DeletedDto,
            SortDirection,
            ApiResponse<DeletedDto>,
            // Auth
            auth_dtos::SignInRequestDto,
            auth_dtos::SignUpRequestDto,
            auth_dtos::ResetPasswordRequestDto,
            auth_dtos::RefreshTokenRequestDto,
            auth_dtos::AuthUserDto,
            auth_dtos::SessionResponseDto,
            auth_dtos::SignUpResponseDto,
            auth_dtos::CurrentSessionDto,
            ApiResponse<auth_dtos::SessionResponseDto>,
            ApiResponse<auth_dtos::SignUpResponseDto>,
            ApiResponse<auth_dtos::CurrentSessionDto>,
            // Profiles
            profiles_dtos::ProfileResponseDto,
            profiles_dtos::UpdateProfileDto,
            ApiResponse<profiles_dtos::ProfileResponseDto>,
            ApiResponse<Vec<profiles_dtos::ProfileResponseDto>>,
            // Projects
            projects_models::ProjectStatus,
            projects_models::Priority,
            projects_models::ProjectStatusTab,
            projects_models::ProjectStatusCounts,
            ProjectTimeline,
            projects_dtos::ProjectSortField,
            projects_dtos::ProjectResponseDto,
            projects_dtos::CreateProjectDto,
            projects_dtos::UpdateProjectDto,
            projects_dtos::ProjectTimelineResponseDto,
            projects_dtos::CollaboratorResponseDto,
            projects_dtos::AddCollaboratorDto,
            ApiResponse<projects_dtos::ProjectResponseDto>,
            ApiResponse<Vec<projects_dtos::ProjectResponseDto>>,
            ApiResponse<projects_models::ProjectStatusCounts>,
            ApiResponse<projects_dtos::ProjectTimelineResponseDto>,
            ApiResponse<projects_dtos::CollaboratorResponseDto>,
            ApiResponse<Vec<projects_dtos::CollaboratorResponseDto>>,
            // Reports
            reports_models::ReportType,
            reports_dtos::ReportResponseDto,
            reports_dtos::CreateReportDto,
            reports_dtos::UpdateReportDto,
            reports_dtos::SetArchivedDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            // Photos
            photos_models::PhotoTask,
            photos_dtos::PhotoResponseDto,
            photos_dtos::PhotoSectionDto,
            photos_dtos::CreatePhotoDto,
            photos_dtos::UpdatePhotoDto,
            photos_dtos::UploadPhotoDto,
            photos_dtos::AddPhotoTaskDto,
            photos_dtos::UpdatePhotoTaskDto,
            ApiResponse<photos_dtos::PhotoResponseDto>,
            ApiResponse<Vec<photos_dtos::PhotoResponseDto>>,
            ApiResponse<Vec<photos_dtos::PhotoSectionDto>>,
            ApiResponse<photos_models::PhotoTask>,
            ApiResponse<Vec<photos_models::PhotoTask>>,
            // Tasks
            tasks_models::TaskStatus,
            tasks_dtos::TaskResponseDto,
            tasks_dtos::CreateTaskDto,
            tasks_dtos::UpdateTaskDto,
            tasks_dtos::SetTaskStatusDto,
            ApiResponse<tasks_dtos::TaskResponseDto>,
            ApiResponse<Vec<tasks_dtos::TaskResponseDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Hosted auth passthrough"),
        (name = "profiles", description = "User profiles"),
        (name = "projects", description = "Projects, timeline and collaborators"),
        (name = "reports", description = "Project reports and previews"),
        (name = "photos", description = "Site photos, date grouping and photo tasks"),
        (name = "tasks", description = "Task management"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Fieldsite API",
        version = "0.1.0",
        description = "API documentation for Fieldsite",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_feature() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/sign-in",
            "/api/profiles/me",
            "/api/projects/{id}/timeline",
            "/api/reports/{id}/preview",
            "/api/photos/grouped",
            "/api/tasks/{id}/status",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_updates_documented_for_put_and_patch() {
        let doc = ApiDoc::openapi();
        for path in ["/api/projects/{id}", "/api/reports/{id}", "/api/tasks/{id}"] {
            let item = &doc.paths.paths[path];
            assert!(item.put.is_some(), "{path} missing PUT");
            assert!(item.patch.is_some(), "{path} missing PATCH");
        }
    }
}
