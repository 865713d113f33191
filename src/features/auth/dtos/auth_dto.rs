use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::clients::{HostedSession, HostedUser};
use crate::features::profiles::dtos::ProfileResponseDto;

/// Request DTO for password sign-in
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct SignInRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request DTO for registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct SignUpRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 128, message = "Name must be 1-128 characters"))]
    pub full_name: Option<String>,
}

/// Request DTO for password recovery
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Where the recovery link should send the user
    #[validate(url(message = "redirect_to must be a valid URL"))]
    pub redirect_to: Option<String>,
}

/// Request DTO for token refresh
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequestDto {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// User info included in auth responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl From<HostedUser> for AuthUserDto {
    fn from(user: HostedUser) -> Self {
        let full_name = user.full_name();
        Self {
            id: user.id,
            email: user.email,
            full_name,
        }
    }
}

/// Session returned by sign-in and refresh
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponseDto {
    pub access_token: String,
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: AuthUserDto,
}

impl From<HostedSession> for SessionResponseDto {
    fn from(session: HostedSession) -> Self {
        Self {
            access_token: session.access_token,
            token_type: session.token_type,
            expires_in: session.expires_in,
            refresh_token: session.refresh_token,
            user: session.user.into(),
        }
    }
}

/// Registration result. `session` is absent while email confirmation is pending.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignUpResponseDto {
    pub user: AuthUserDto,
    pub session: Option<SessionResponseDto>,
    pub confirmation_required: bool,
}

/// Current session user and their profile row
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentSessionDto {
    pub user: AuthUserDto,
    pub profile: Option<ProfileResponseDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_validation() {
        let dto = SignUpRequestDto {
            email: "crew@example.com".to_string(),
            password: "hunter22".to_string(),
            full_name: Some("Site Crew".to_string()),
        };
        assert!(dto.validate().is_ok());

        let dto = SignUpRequestDto {
            email: "not-an-email".to_string(),
            password: "123".to_string(),
            full_name: None,
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }
}
