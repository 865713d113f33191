use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// `project_collaborators` row joined with the collaborator's profile
#[derive(Debug, Clone, FromRow)]
pub struct Collaborator {
    pub project_id: Uuid,
    pub profile_id: Uuid,
    pub role: String,
    pub added_at: DateTime<Utc>,
    pub full_name: Option<String>,
    pub email: String,
}
