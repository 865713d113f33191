use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::PhotoTask;

/// Database model for `photos`
#[derive(Debug, Clone, FromRow)]
pub struct Photo {
    pub id: Uuid,
    pub project_id: Option<Uuid>,
    pub url: String,
    pub caption: Option<String>,
    pub taken_on: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub assignee: Option<String>,
    pub group_name: Option<String>,
    pub tasks: Json<Vec<PhotoTask>>,
    /// Set only for photos uploaded through this service
    pub storage_key: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
