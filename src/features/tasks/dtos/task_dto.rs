use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::projects::models::Priority;
use crate::features::tasks::models::{Task, TaskStatus};
use crate::shared::types::{default_page, default_page_size, PaginationQuery};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub category: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponseDto {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            status: t.status,
            priority: t.priority,
            category: t.category,
            assigned_to: t.assigned_to,
            project_id: t.project_id,
            due_date: t.due_date,
            completed_at: t.completed_at,
            created_by: t.created_by,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Query params for listing tasks
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct TaskQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    pub project_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<Uuid>,
    pub category: Option<String>,
}

impl TaskQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.page_size)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTaskDto {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "crate::shared::validation::not_blank")
    )]
    pub title: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    pub priority: Option<Priority>,

    #[validate(length(max = 64))]
    pub category: Option<String>,

    pub assigned_to: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskDto {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "crate::shared::validation::not_blank")
    )]
    pub title: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    /// Moving to `completed` stamps `completed_at`; back to `active` clears it
    pub status: Option<TaskStatus>,

    pub priority: Option<Priority>,

    #[validate(length(max = 64))]
    pub category: Option<String>,

    pub assigned_to: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct SetTaskStatusDto {
    pub status: TaskStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_task_validation() {
        let dto = CreateTaskDto {
            title: "Order lumber".to_string(),
            priority: Some(Priority::High),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());

        let dto = CreateTaskDto {
            title: " ".to_string(),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_status_and_priority_wire_names() {
        let dto: SetTaskStatusDto = serde_json::from_value(json!({ "status": "completed" })).unwrap();
        assert_eq!(dto.status, TaskStatus::Completed);

        let p: Priority = serde_json::from_value(json!("low")).unwrap();
        assert_eq!(p, Priority::Low);
        assert!(Priority::High < Priority::Low);
    }
}
