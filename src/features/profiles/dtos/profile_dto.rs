use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::profiles::models::Profile;

/// Profile response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponseDto {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponseDto {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            email: p.email,
            full_name: p.full_name,
            role: p.role,
            phone: p.phone,
            avatar_url: p.avatar_url,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Query params for listing profiles
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
pub struct ProfileQueryParams {
    /// Filter by role (admin, manager, member)
    #[validate(custom(function = "crate::shared::validation::valid_profile_role"))]
    pub role: Option<String>,
    /// Search in name or email
    pub search: Option<String>,
}

/// Request DTO for updating the caller's profile.
///
/// Role changes are not self-service; a `role` key in the body is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(max = 128, message = "Name must not exceed 128 characters"))]
    pub full_name: Option<String>,

    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Phone number format is invalid"
    ))]
    pub phone: Option<String>,

    #[validate(url(message = "Avatar must be a valid URL"))]
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_profile_validation() {
        let dto = UpdateProfileDto {
            full_name: Some("Maria Lopez".to_string()),
            phone: Some("+1 555 010 2000".to_string()),
            avatar_url: Some("https://cdn.example.com/a.png".to_string()),
        };
        assert!(dto.validate().is_ok());

        let dto = UpdateProfileDto {
            phone: Some("not a phone".to_string()),
            ..Default::default()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
    }

    #[test]
    fn test_self_update_cannot_carry_role() {
        let dto: UpdateProfileDto =
            serde_json::from_value(json!({ "full_name": "Maria", "role": "admin" })).unwrap();
        let body = serde_json::to_value(&dto).unwrap();
        assert!(body.get("role").is_none());
        assert_eq!(dto.full_name.as_deref(), Some("Maria"));
    }

    #[test]
    fn test_role_filter_must_be_known() {
        let params = ProfileQueryParams {
            role: Some("manager".to_string()),
            search: None,
        };
        assert!(params.validate().is_ok());

        let params = ProfileQueryParams {
            role: Some("owner".to_string()),
            search: None,
        };
        assert!(params.validate().is_err());
    }
}
