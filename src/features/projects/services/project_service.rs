use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::projects::dtos::{
    AddCollaboratorDto, CreateProjectDto, ProjectQueryParams, UpdateProjectDto,
    DEFAULT_COLLABORATOR_ROLE,
};
use crate::features::projects::models::{
    Collaborator, Priority, Project, ProjectStatus, ProjectStatusCounts,
};

const COLUMNS: &str = "id, name, description, status, priority, address, city, state, zip_code,
    contact_name, contact_email, contact_phone, start_date, end_date, created_by,
    created_at, updated_at";

/// Shared WHERE clause for list and count: $1 status, $2 search pattern
const LIST_FILTER: &str = "($1::project_status IS NULL OR status = $1)
    AND ($2::TEXT IS NULL OR name ILIKE $2 ESCAPE '\\' OR city ILIKE $2 ESCAPE '\\')";

/// Service for project operations
pub struct ProjectService {
    pool: PgPool,
}

impl ProjectService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List projects under a status tab with search, sort and pagination
    pub async fn list(&self, params: &ProjectQueryParams) -> Result<(Vec<Project>, i64)> {
        let status = params.status.status();
        let search = params.search_pattern();

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM projects WHERE {LIST_FILTER}"))
                .bind(status)
                .bind(search.as_deref())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count projects: {:?}", e);
                    AppError::Database(e)
                })?;

        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE {LIST_FILTER}
             ORDER BY {}
             LIMIT $3 OFFSET $4",
            params.order_by()
        );

        let projects = sqlx::query_as::<_, Project>(&query)
            .bind(status)
            .bind(search.as_deref())
            .bind(params.pagination().limit())
            .bind(params.pagination().offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list projects: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((projects, total))
    }

    /// Project counts per status tab
    pub async fn summary(&self) -> Result<ProjectStatusCounts> {
        let rows: Vec<(ProjectStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM projects GROUP BY status")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to summarize projects: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(ProjectStatusCounts::tally(&rows))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Project> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get project: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))
    }

    /// 404 unless the project exists
    pub async fn ensure_exists(&self, id: Uuid) -> Result<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if exists {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Project {} not found", id)))
        }
    }

    /// Insert one project. `created_by` is dropped when no profile has that id.
    pub async fn create(&self, dto: &CreateProjectDto, created_by: Option<Uuid>) -> Result<Project> {
        let query = format!(
            "INSERT INTO projects (
                name, description, status, priority, address, city, state, zip_code,
                contact_name, contact_email, contact_phone, start_date, end_date, created_by
             )
             VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                (SELECT id FROM profiles WHERE id = $14)
             )
             RETURNING {COLUMNS}"
        );

        let project = sqlx::query_as::<_, Project>(&query)
            .bind(dto.name.trim())
            .bind(dto.description.as_deref())
            .bind(dto.status.unwrap_or(ProjectStatus::Active))
            .bind(dto.priority.unwrap_or(Priority::Medium))
            .bind(dto.address.as_deref())
            .bind(dto.city.as_deref())
            .bind(dto.state.as_deref())
            .bind(dto.zip_code.as_deref())
            .bind(dto.contact_name.as_deref())
            .bind(dto.contact_email.as_deref())
            .bind(dto.contact_phone.as_deref())
            .bind(dto.start_date)
            .bind(dto.end_date)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create project: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Created project: {} ({})", project.id, project.name);
        Ok(project)
    }

    /// Partial update; `None` fields are left untouched
    pub async fn update(&self, id: Uuid, dto: &UpdateProjectDto) -> Result<Project> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                priority = COALESCE($5, priority),
                address = COALESCE($6, address),
                city = COALESCE($7, city),
                state = COALESCE($8, state),
                zip_code = COALESCE($9, zip_code),
                contact_name = COALESCE($10, contact_name),
                contact_email = COALESCE($11, contact_email),
                contact_phone = COALESCE($12, contact_phone),
                start_date = COALESCE($13, start_date),
                end_date = COALESCE($14, end_date),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );

        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(dto.name.as_deref().map(str::trim))
            .bind(dto.description.as_deref())
            .bind(dto.status)
            .bind(dto.priority)
            .bind(dto.address.as_deref())
            .bind(dto.city.as_deref())
            .bind(dto.state.as_deref())
            .bind(dto.zip_code.as_deref())
            .bind(dto.contact_name.as_deref())
            .bind(dto.contact_email.as_deref())
            .bind(dto.contact_phone.as_deref())
            .bind(dto.start_date)
            .bind(dto.end_date)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update project {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))?;

        tracing::info!("Updated project: {}", id);
        Ok(project)
    }

    /// Delete exactly one project by id, returning the removed id.
    ///
    /// Reports, tasks and collaborator rows go with it; photos are kept
    /// with a cleared project reference.
    pub async fn delete(&self, id: Uuid) -> Result<Uuid> {
        let deleted: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM projects WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to delete project {}: {:?}", id, e);
                    AppError::Database(e)
                })?;

        let deleted = deleted.ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))?;
        tracing::info!("Deleted project: {}", deleted);
        Ok(deleted)
    }

    // =========================================================================
    // COLLABORATORS
    // =========================================================================

    pub async fn list_collaborators(&self, project_id: Uuid) -> Result<Vec<Collaborator>> {
        self.ensure_exists(project_id).await?;

        sqlx::query_as::<_, Collaborator>(
            "SELECT c.project_id, c.profile_id, c.role, c.added_at, p.full_name, p.email
             FROM project_collaborators c
             JOIN profiles p ON p.id = c.profile_id
             WHERE c.project_id = $1
             ORDER BY c.added_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list collaborators: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn add_collaborator(
        &self,
        project_id: Uuid,
        dto: &AddCollaboratorDto,
    ) -> Result<Collaborator> {
        self.ensure_exists(project_id).await?;

        let role = dto.role.as_deref().unwrap_or(DEFAULT_COLLABORATOR_ROLE);

        let collaborator = sqlx::query_as::<_, Collaborator>(
            "WITH inserted AS (
                INSERT INTO project_collaborators (project_id, profile_id, role)
                VALUES ($1, $2, $3)
                RETURNING project_id, profile_id, role, added_at
             )
             SELECT i.project_id, i.profile_id, i.role, i.added_at, p.full_name, p.email
             FROM inserted i
             JOIN profiles p ON p.id = i.profile_id",
        )
        .bind(project_id)
        .bind(dto.profile_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let code = e
                .as_database_error()
                .and_then(|d| d.code())
                .map(|c| c.into_owned());
            match code.as_deref() {
                Some("23505") => AppError::Conflict(format!(
                    "Profile {} is already a collaborator on this project",
                    dto.profile_id
                )),
                Some("23503") => {
                    AppError::NotFound(format!("Profile {} not found", dto.profile_id))
                }
                _ => {
                    tracing::error!("Failed to add collaborator: {:?}", e);
                    AppError::Database(e)
                }
            }
        })?;

        tracing::info!(
            "Added collaborator {} to project {}",
            collaborator.profile_id,
            project_id
        );
        Ok(collaborator)
    }

    pub async fn remove_collaborator(&self, project_id: Uuid, profile_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM project_collaborators WHERE project_id = $1 AND profile_id = $2",
        )
        .bind(project_id)
        .bind(profile_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to remove collaborator: {:?}", e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Profile {} is not a collaborator on project {}",
                profile_id, project_id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::profiles::ProfileService;

    fn project(name: &str) -> CreateProjectDto {
        CreateProjectDto {
            name: name.to_string(),
            city: Some("Austin".to_string()),
            ..Default::default()
        }
    }

    async fn count(pool: &PgPool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await
            .expect("count projects")
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_removes_only_that_project(pool: PgPool) {
        let service = ProjectService::new(pool.clone());
        let kept = service.create(&project("Kitchen remodel"), None).await.unwrap();
        let removed = service.create(&project("Roof repair"), None).await.unwrap();

        let deleted = service.delete(removed.id).await.unwrap();

        assert_eq!(deleted, removed.id);
        assert_eq!(count(&pool).await, 1);
        assert_eq!(service.get_by_id(kept.id).await.unwrap().name, "Kitchen remodel");
        assert!(matches!(
            service.get_by_id(removed.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_unknown_project_is_not_found(pool: PgPool) {
        let service = ProjectService::new(pool.clone());
        service.create(&project("Deck"), None).await.unwrap();

        let result = service.delete(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(count(&pool).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_without_profile_row_leaves_creator_empty(pool: PgPool) {
        let service = ProjectService::new(pool.clone());

        let created = service
            .create(&project("Basement"), Some(Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(created.created_by, None);
        assert_eq!(count(&pool).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_records_known_creator(pool: PgPool) {
        let profile = ProfileService::new(pool.clone())
            .upsert_from_auth(Uuid::new_v4(), "pm@example.com", Some("Site Lead"))
            .await
            .unwrap();
        let service = ProjectService::new(pool);

        let created = service
            .create(&project("Garage"), Some(profile.id))
            .await
            .unwrap();

        assert_eq!(created.created_by, Some(profile.id));
    }
}
