use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::projects::models::Collaborator;

pub const DEFAULT_COLLABORATOR_ROLE: &str = "collaborator";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollaboratorResponseDto {
    pub project_id: Uuid,
    pub profile_id: Uuid,
    pub role: String,
    pub full_name: Option<String>,
    pub email: String,
    pub added_at: DateTime<Utc>,
}

impl From<Collaborator> for CollaboratorResponseDto {
    fn from(c: Collaborator) -> Self {
        Self {
            project_id: c.project_id,
            profile_id: c.profile_id,
            role: c.role,
            full_name: c.full_name,
            email: c.email,
            added_at: c.added_at,
        }
    }
}

/// Request DTO for adding a collaborator to a project
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddCollaboratorDto {
    pub profile_id: Uuid,

    /// Free-text role on the project (default: collaborator)
    #[validate(length(min = 1, max = 64, message = "Role must be 1-64 characters"))]
    pub role: Option<String>,
}
