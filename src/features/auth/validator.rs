use super::model::AuthenticatedUser;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

/// Validates HS256 access tokens issued by the hosted auth service
pub struct JwtValidator {
    decoding_key: DecodingKey,
    audience: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(rename = "aud")]
    _aud: AudienceClaim,
    #[serde(rename = "exp")]
    _exp: u64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
}

/// Audience can be either a single string or an array of strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
enum AudienceClaim {
    Single(String),
    Multiple(Vec<String>),
}

impl JwtValidator {
    pub fn new(secret: &str, audience: String, leeway: Duration) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::HS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only HS256 is allowed",
                header.alg
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?
            .claims;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Auth("Token subject is not a valid user id".to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            email: claims.email,
            role: claims.role,
            session_id: claims.session_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::sign_test_token;

    const SECRET: &str = "super-secret-jwt-token-for-tests";

    fn validator() -> JwtValidator {
        JwtValidator::new(SECRET, "authenticated".to_string(), Duration::from_secs(0))
    }

    #[test]
    fn test_valid_token() {
        let user_id = Uuid::new_v4();
        let token = sign_test_token(SECRET, user_id, "authenticated", 600);

        let user = validator().validate_token(&token).unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.role.as_deref(), Some("authenticated"));
        assert_eq!(user.email.as_deref(), Some("tester@example.com"));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = sign_test_token(SECRET, Uuid::new_v4(), "authenticated", -600);
        assert!(matches!(
            validator().validate_token(&token),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let token = sign_test_token(SECRET, Uuid::new_v4(), "someone-else", 600);
        assert!(validator().validate_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign_test_token("another-secret", Uuid::new_v4(), "authenticated", 600);
        assert!(validator().validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(validator().validate_token("not-a-jwt").is_err());
    }
}
