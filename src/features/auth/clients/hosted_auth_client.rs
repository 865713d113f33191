use crate::core::config::HostedBackendConfig;
use crate::core::error::{AppError, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// User object returned by the hosted auth API
#[derive(Debug, Clone, Deserialize)]
pub struct HostedUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl HostedUser {
    pub fn full_name(&self) -> Option<String> {
        self.user_metadata
            .get("full_name")
            .and_then(|v| v.as_str())
            .map(String::from)
    }
}

/// Token response of the password / refresh grants
#[derive(Debug, Clone, Deserialize)]
pub struct HostedSession {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: HostedUser,
}

/// Sign-up returns a session when auto-confirm is on, otherwise just the user
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SignUpOutcome {
    Session(HostedSession),
    PendingConfirmation(HostedUser),
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

/// Error body shapes differ between endpoints, so every field is optional
#[derive(Debug, Default, Deserialize)]
struct HostedAuthError {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl HostedAuthError {
    fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    fn text(&self) -> String {
        self.error_description
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

/// Client for the hosted auth REST API (`/auth/v1`)
pub struct HostedAuthClient {
    base_url: String,
    anon_key: String,
    http_client: reqwest::Client,
}

impl HostedAuthClient {
    pub fn new(config: HostedBackendConfig) -> Self {
        Self {
            base_url: config.url,
            anon_key: config.anon_key,
            http_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, self.url(path))
            .header("apikey", &self.anon_key)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        builder.send().await.map_err(|e| {
            tracing::error!("Hosted auth request failed: {}", e);
            AppError::ExternalServiceError(format!("Hosted auth unreachable: {}", e))
        })
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse hosted auth response: {}", e);
            AppError::ExternalServiceError(format!("Failed to parse auth response: {}", e))
        })
    }

    /// Password grant (`signInWithPassword`)
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<HostedSession> {
        let response = self
            .send(
                self.request(reqwest::Method::POST, "token?grant_type=password")
                    .bearer_auth(&self.anon_key)
                    .json(&PasswordGrant { email, password }),
            )
            .await?;

        let status = response.status();
        if status.is_success() {
            return Self::parse_json(response).await;
        }

        let body = response.text().await.unwrap_or_default();
        let error = HostedAuthError::parse(&body);
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
                tracing::debug!("Sign-in rejected for {}: {}", email, error.text());
                Err(AppError::Unauthorized(error.text()))
            }
            _ => Err(unexpected_status(status, &body)),
        }
    }

    /// Register a new account (`signUp`)
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<SignUpOutcome> {
        let body = json!({
            "email": email,
            "password": password,
            "data": { "full_name": full_name },
        });

        let response = self
            .send(
                self.request(reqwest::Method::POST, "signup")
                    .bearer_auth(&self.anon_key)
                    .json(&body),
            )
            .await?;

        let status = response.status();
        if status.is_success() {
            let outcome: SignUpOutcome = Self::parse_json(response).await?;
            tracing::info!("Registered hosted auth user: {}", email);
            return Ok(outcome);
        }

        let body = response.text().await.unwrap_or_default();
        let error = HostedAuthError::parse(&body);
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let text = error.text();
                if text.to_lowercase().contains("already") {
                    Err(AppError::Conflict("Email already registered".to_string()))
                } else {
                    Err(AppError::Validation(text))
                }
            }
            _ => Err(unexpected_status(status, &body)),
        }
    }

    /// Exchange a refresh token for a new session
    pub async fn refresh(&self, refresh_token: &str) -> Result<HostedSession> {
        let response = self
            .send(
                self.request(reqwest::Method::POST, "token?grant_type=refresh_token")
                    .bearer_auth(&self.anon_key)
                    .json(&json!({ "refresh_token": refresh_token })),
            )
            .await?;

        let status = response.status();
        if status.is_success() {
            return Self::parse_json(response).await;
        }

        let body = response.text().await.unwrap_or_default();
        if status.is_client_error() {
            return Err(AppError::Unauthorized(HostedAuthError::parse(&body).text()));
        }
        Err(unexpected_status(status, &body))
    }

    /// Revoke the session behind `access_token` (`signOut`)
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = self
            .send(
                self.request(reqwest::Method::POST, "logout")
                    .bearer_auth(access_token),
            )
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Unauthorized(HostedAuthError::parse(&body).text()));
        }
        Err(unexpected_status(status, &body))
    }

    /// Send a password recovery email (`resetPasswordForEmail`)
    pub async fn reset_password(&self, email: &str, redirect_to: Option<&str>) -> Result<()> {
        let path = match redirect_to {
            Some(redirect) => format!("recover?redirect_to={}", urlencoding::encode(redirect)),
            None => "recover".to_string(),
        };

        let response = self
            .send(
                self.request(reqwest::Method::POST, &path)
                    .bearer_auth(&self.anon_key)
                    .json(&json!({ "email": email })),
            )
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("Password recovery requested for {}", email);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if status.is_client_error() {
            return Err(AppError::BadRequest(HostedAuthError::parse(&body).text()));
        }
        Err(unexpected_status(status, &body))
    }

    /// Fetch the user behind an access token (session retrieval)
    pub async fn get_user(&self, access_token: &str) -> Result<HostedUser> {
        let response = self
            .send(
                self.request(reqwest::Method::GET, "user")
                    .bearer_auth(access_token),
            )
            .await?;

        let status = response.status();
        if status.is_success() {
            return Self::parse_json(response).await;
        }

        let body = response.text().await.unwrap_or_default();
        if status.is_client_error() {
            return Err(AppError::Unauthorized(HostedAuthError::parse(&body).text()));
        }
        Err(unexpected_status(status, &body))
    }
}

fn unexpected_status(status: StatusCode, body: &str) -> AppError {
    tracing::error!("Hosted auth API error: HTTP {} - {}", status, body);
    AppError::ExternalServiceError(format!("Hosted auth API error: HTTP {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_text_prefers_description() {
        let error = HostedAuthError::parse(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(error.text(), "Invalid login credentials");

        let error = HostedAuthError::parse(r#"{"code":422,"msg":"User already registered"}"#);
        assert_eq!(error.text(), "User already registered");

        assert_eq!(HostedAuthError::parse("<html>").text(), "Unknown error");
    }

    #[test]
    fn test_sign_up_outcome_variants() {
        let session = r#"{
            "access_token": "a", "token_type": "bearer", "expires_in": 3600,
            "refresh_token": "r",
            "user": {"id": "6f1d2c1e-8a4b-4c1f-9d39-2b6f0c7a1e11", "email": "a@b.co",
                     "user_metadata": {"full_name": "Ada"}}
        }"#;
        match serde_json::from_str::<SignUpOutcome>(session).unwrap() {
            SignUpOutcome::Session(s) => assert_eq!(s.user.full_name().as_deref(), Some("Ada")),
            other => panic!("expected session, got {:?}", other),
        }

        let pending = r#"{"id": "6f1d2c1e-8a4b-4c1f-9d39-2b6f0c7a1e11", "email": "a@b.co"}"#;
        assert!(matches!(
            serde_json::from_str::<SignUpOutcome>(pending).unwrap(),
            SignUpOutcome::PendingConfirmation(_)
        ));
    }
}
