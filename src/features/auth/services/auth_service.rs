use crate::core::error::Result;
use crate::features::auth::clients::{HostedAuthClient, HostedUser, SignUpOutcome};
use crate::features::auth::dtos::{
    CurrentSessionDto, RefreshTokenRequestDto, ResetPasswordRequestDto, SessionResponseDto,
    SignInRequestDto, SignUpRequestDto, SignUpResponseDto,
};
use crate::features::profiles::ProfileService;
use std::sync::Arc;

/// Authentication passthrough to the hosted auth service
pub struct AuthService {
    client: Arc<HostedAuthClient>,
    profile_service: Arc<ProfileService>,
}

impl AuthService {
    pub fn new(client: Arc<HostedAuthClient>, profile_service: Arc<ProfileService>) -> Self {
        Self {
            client,
            profile_service,
        }
    }

    /// Password sign-in. Users created directly in the hosted service get
    /// their profile row here.
    pub async fn sign_in(&self, dto: SignInRequestDto) -> Result<SessionResponseDto> {
        let session = self.client.sign_in(&dto.email, &dto.password).await?;
        self.sync_profile(&session.user, &dto.email, None).await?;
        tracing::info!("User signed in: {}", session.user.id);
        Ok(session.into())
    }

    /// Register with the hosted service, then make sure a profile row exists
    pub async fn sign_up(&self, dto: SignUpRequestDto) -> Result<SignUpResponseDto> {
        let outcome = self
            .client
            .sign_up(&dto.email, &dto.password, dto.full_name.as_deref())
            .await?;

        let (user, session) = match outcome {
            SignUpOutcome::Session(session) => (session.user.clone(), Some(session)),
            SignUpOutcome::PendingConfirmation(user) => (user, None),
        };

        self.sync_profile(&user, &dto.email, dto.full_name.clone())
            .await?;

        Ok(SignUpResponseDto {
            confirmation_required: session.is_none(),
            user: user.into(),
            session: session.map(Into::into),
        })
    }

    async fn sync_profile(
        &self,
        user: &HostedUser,
        fallback_email: &str,
        full_name: Option<String>,
    ) -> Result<()> {
        let (email, full_name) = profile_fields(user, fallback_email, full_name);
        self.profile_service
            .upsert_from_auth(user.id, &email, full_name.as_deref())
            .await?;
        Ok(())
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        self.client.sign_out(access_token).await
    }

    pub async fn reset_password(&self, dto: ResetPasswordRequestDto) -> Result<()> {
        self.client
            .reset_password(&dto.email, dto.redirect_to.as_deref())
            .await
    }

    pub async fn refresh(&self, dto: RefreshTokenRequestDto) -> Result<SessionResponseDto> {
        Ok(self.client.refresh(&dto.refresh_token).await?.into())
    }

    /// Resolve the user behind an access token and attach their profile
    pub async fn current_session(&self, access_token: &str) -> Result<CurrentSessionDto> {
        let user = self.client.get_user(access_token).await?;
        let profile = self.profile_service.find_by_id(user.id).await?;

        Ok(CurrentSessionDto {
            user: user.into(),
            profile: profile.map(Into::into),
        })
    }
}

/// Email and name for the profile row: hosted values win for the email,
/// an explicit name wins over the hosted metadata.
fn profile_fields(
    user: &HostedUser,
    fallback_email: &str,
    full_name: Option<String>,
) -> (String, Option<String>) {
    let email = user
        .email
        .clone()
        .unwrap_or_else(|| fallback_email.to_string());
    (email, full_name.or_else(|| user.full_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn hosted_user(email: Option<&str>, metadata: serde_json::Value) -> HostedUser {
        HostedUser {
            id: Uuid::new_v4(),
            email: email.map(String::from),
            user_metadata: metadata,
        }
    }

    #[test]
    fn test_sign_in_profile_uses_hosted_metadata() {
        let user = hosted_user(Some("site@example.com"), json!({ "full_name": "Ana Ruiz" }));
        let (email, name) = profile_fields(&user, "typed@example.com", None);
        assert_eq!(email, "site@example.com");
        assert_eq!(name.as_deref(), Some("Ana Ruiz"));
    }

    #[test]
    fn test_profile_falls_back_to_typed_email_and_given_name() {
        let user = hosted_user(None, json!({ "full_name": "Metadata Name" }));
        let (email, name) =
            profile_fields(&user, "typed@example.com", Some("Given Name".to_string()));
        assert_eq!(email, "typed@example.com");
        assert_eq!(name.as_deref(), Some("Given Name"));
    }
}
