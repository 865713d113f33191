use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::projects::ProjectService;
use crate::features::reports::dtos::{CreateReportDto, ReportQueryParams, UpdateReportDto};
use crate::features::reports::models::Report;
use crate::features::reports::preview;

const COLUMNS: &str = "id, project_id, report_type, title, content, generated_at, archived,
    created_by, created_at, updated_at";

const LIST_FILTER: &str = "($1::UUID IS NULL OR project_id = $1)
    AND ($2::report_type IS NULL OR report_type = $2)
    AND archived = $3";

/// Service for report operations
pub struct ReportService {
    pool: PgPool,
    project_service: Arc<ProjectService>,
}

impl ReportService {
    pub fn new(pool: PgPool, project_service: Arc<ProjectService>) -> Self {
        Self {
            pool,
            project_service,
        }
    }

    /// List reports, newest first
    pub async fn list(&self, params: &ReportQueryParams) -> Result<(Vec<Report>, i64)> {
        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM reports WHERE {LIST_FILTER}"))
                .bind(params.project_id)
                .bind(params.report_type)
                .bind(params.archived)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count reports: {:?}", e);
                    AppError::Database(e)
                })?;

        let query = format!(
            "SELECT {COLUMNS} FROM reports
             WHERE {LIST_FILTER}
             ORDER BY generated_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );

        let reports = sqlx::query_as::<_, Report>(&query)
            .bind(params.project_id)
            .bind(params.report_type)
            .bind(params.archived)
            .bind(params.pagination().limit())
            .bind(params.pagination().offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((reports, total))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Report> {
        let query = format!("SELECT {COLUMNS} FROM reports WHERE id = $1");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get report: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// Insert one report. Expects a validated DTO.
    pub async fn create(&self, dto: &CreateReportDto, created_by: Option<Uuid>) -> Result<Report> {
        let (Some(project_id), Some(report_type), Some(title)) =
            (dto.project_id, dto.report_type, dto.title.as_deref())
        else {
            return Err(AppError::BadRequest(
                "project_id, report_type and title are required".to_string(),
            ));
        };

        self.project_service.ensure_exists(project_id).await?;

        let query = format!(
            "INSERT INTO reports (project_id, report_type, title, content, generated_at, created_by)
             VALUES ($1, $2, $3, $4, $5, (SELECT id FROM profiles WHERE id = $6))
             RETURNING {COLUMNS}"
        );

        let report = sqlx::query_as::<_, Report>(&query)
            .bind(project_id)
            .bind(report_type)
            .bind(title.trim())
            .bind(dto.content.clone().unwrap_or_else(|| json!({})))
            .bind(dto.generated_at.unwrap_or_else(Utc::now))
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create report: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(
            "Created {} report: {} for project: {}",
            report.report_type,
            report.id,
            project_id
        );
        Ok(report)
    }

    pub async fn update(&self, id: Uuid, dto: &UpdateReportDto) -> Result<Report> {
        let query = format!(
            "UPDATE reports SET
                report_type = COALESCE($2, report_type),
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                generated_at = COALESCE($5, generated_at),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );

        let report = sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(dto.report_type)
            .bind(dto.title.as_deref().map(str::trim))
            .bind(dto.content.as_ref())
            .bind(dto.generated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update report {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        tracing::info!("Updated report: {}", id);
        Ok(report)
    }

    pub async fn set_archived(&self, id: Uuid, archived: bool) -> Result<Report> {
        let query = format!(
            "UPDATE reports SET archived = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );

        let report = sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(archived)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to archive report {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        tracing::info!("Report {} archived={}", id, archived);
        Ok(report)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Uuid> {
        let deleted: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM reports WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to delete report {}: {:?}", id, e);
                    AppError::Database(e)
                })?;

        deleted.ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// Render the report and its project header as HTML
    pub async fn preview(&self, id: Uuid) -> Result<String> {
        let report = self.get_by_id(id).await?;
        let project = self.project_service.get_by_id(report.project_id).await?;
        Ok(preview::render_preview(&report, &project)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::projects::dtos::CreateProjectDto;
    use crate::features::reports::models::ReportType;

    fn services(pool: &PgPool) -> (Arc<ProjectService>, ReportService) {
        let projects = Arc::new(ProjectService::new(pool.clone()));
        let reports = ReportService::new(pool.clone(), Arc::clone(&projects));
        (projects, reports)
    }

    fn daily_log(project_id: Uuid) -> CreateReportDto {
        CreateReportDto {
            project_id: Some(project_id),
            report_type: Some(ReportType::DailyLog),
            title: Some("  Day 3 pour  ".to_string()),
            content: Some(json!({ "weather": "Clear", "crew_count": 6 })),
            generated_at: None,
        }
    }

    async fn count(pool: &PgPool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM reports")
            .fetch_one(pool)
            .await
            .expect("count reports")
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_appends_one_report(pool: PgPool) {
        let (projects, reports) = services(&pool);
        let project = projects
            .create(
                &CreateProjectDto {
                    name: "Foundation".to_string(),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        let report = reports.create(&daily_log(project.id), None).await.unwrap();

        assert_eq!(count(&pool).await, 1);
        assert_eq!(report.project_id, project.id);
        assert_eq!(report.report_type, ReportType::DailyLog);
        assert_eq!(report.title, "Day 3 pour");
        assert_eq!(report.content["crew_count"], 6);
        assert!(!report.archived);
        assert_eq!(reports.get_by_id(report.id).await.unwrap().title, "Day 3 pour");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_for_unknown_project_is_not_found(pool: PgPool) {
        let (_, reports) = services(&pool);

        let result = reports.create(&daily_log(Uuid::new_v4()), None).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(count(&pool).await, 0);
    }
}
