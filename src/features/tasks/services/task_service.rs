use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::projects::models::Priority;
use crate::features::tasks::dtos::{CreateTaskDto, TaskQueryParams, UpdateTaskDto};
use crate::features::tasks::models::{Task, TaskStatus};

const COLUMNS: &str = "id, title, description, status, priority, category, assigned_to,
    project_id, due_date, completed_at, created_by, created_at, updated_at";

const LIST_FILTER: &str = "($1::UUID IS NULL OR project_id = $1)
    AND ($2::task_status IS NULL OR status = $2)
    AND ($3::priority_level IS NULL OR priority = $3)
    AND ($4::UUID IS NULL OR assigned_to = $4)
    AND ($5::TEXT IS NULL OR category = $5)";

/// `priority_level` is declared low..high, so DESC puts high first
const LIST_ORDER: &str = "priority DESC, due_date ASC NULLS LAST, created_at DESC";

/// `completed_at` follows status: stamped on completion, cleared on reopen
const COMPLETED_AT_FOR_STATUS: &str = "CASE
    WHEN $2::task_status IS NULL THEN completed_at
    WHEN $2::task_status = 'completed' THEN COALESCE(completed_at, NOW())
    ELSE NULL
END";

/// Service for task operations
pub struct TaskService {
    pool: PgPool,
}

impl TaskService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Filtered list, highest priority and nearest due date first
    pub async fn list(&self, params: &TaskQueryParams) -> Result<(Vec<Task>, i64)> {
        let category = params.category.as_deref().map(str::trim);

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM tasks WHERE {LIST_FILTER}"))
                .bind(params.project_id)
                .bind(params.status)
                .bind(params.priority)
                .bind(params.assigned_to)
                .bind(category)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count tasks: {:?}", e);
                    AppError::Database(e)
                })?;

        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE {LIST_FILTER}
             ORDER BY {LIST_ORDER}
             LIMIT $6 OFFSET $7"
        );

        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(params.project_id)
            .bind(params.status)
            .bind(params.priority)
            .bind(params.assigned_to)
            .bind(category)
            .bind(params.pagination().limit())
            .bind(params.pagination().offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list tasks: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((tasks, total))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Task> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get task: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))
    }

    pub async fn create(&self, dto: &CreateTaskDto, created_by: Option<Uuid>) -> Result<Task> {
        let query = format!(
            "INSERT INTO tasks (
                title, description, priority, category, assigned_to, project_id, due_date,
                created_by
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, (SELECT id FROM profiles WHERE id = $8))
             RETURNING {COLUMNS}"
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(dto.title.trim())
            .bind(dto.description.as_deref())
            .bind(dto.priority.unwrap_or(Priority::Medium))
            .bind(dto.category.as_deref().map(str::trim))
            .bind(dto.assigned_to)
            .bind(dto.project_id)
            .bind(dto.due_date)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create task: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Created task: {}", task.id);
        Ok(task)
    }

    pub async fn update(&self, id: Uuid, dto: &UpdateTaskDto) -> Result<Task> {
        let query = format!(
            "UPDATE tasks SET
                status = COALESCE($2, status),
                completed_at = {COMPLETED_AT_FOR_STATUS},
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                priority = COALESCE($5, priority),
                category = COALESCE($6, category),
                assigned_to = COALESCE($7, assigned_to),
                project_id = COALESCE($8, project_id),
                due_date = COALESCE($9, due_date),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(dto.status)
            .bind(dto.title.as_deref().map(str::trim))
            .bind(dto.description.as_deref())
            .bind(dto.priority)
            .bind(dto.category.as_deref().map(str::trim))
            .bind(dto.assigned_to)
            .bind(dto.project_id)
            .bind(dto.due_date)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update task {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))
    }

    pub async fn set_status(&self, id: Uuid, status: TaskStatus) -> Result<Task> {
        let query = format!(
            "UPDATE tasks SET
                status = $2,
                completed_at = {COMPLETED_AT_FOR_STATUS},
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to set task status {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))?;

        tracing::info!("Task {} is now {}", id, status);
        Ok(task)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Uuid> {
        let deleted: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM tasks WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to delete task {}: {:?}", id, e);
                    AppError::Database(e)
                })?;

        deleted.ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str) -> CreateTaskDto {
        CreateTaskDto {
            title: title.to_string(),
            description: None,
            priority: None,
            category: Some("Electrical".to_string()),
            assigned_to: None,
            project_id: None,
            due_date: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_set_status_stamps_and_clears_completed_at(pool: PgPool) {
        let service = TaskService::new(pool);
        let created = service.create(&task("Pull permits"), None).await.unwrap();
        assert_eq!(created.status, TaskStatus::Active);
        assert!(created.completed_at.is_none());

        let done = service
            .set_status(created.id, TaskStatus::Completed)
            .await
            .unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.completed_at.is_some());

        let reopened = service
            .set_status(created.id, TaskStatus::Active)
            .await
            .unwrap();
        assert_eq!(reopened.status, TaskStatus::Active);
        assert!(reopened.completed_at.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_set_status_unknown_task_is_not_found(pool: PgPool) {
        let service = TaskService::new(pool);

        let result = service
            .set_status(Uuid::new_v4(), TaskStatus::Completed)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
