//! JWT token creation with configurable signing and TTL.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use contacts_core::config::AuthConfig;
use contacts_core::error::AppError;

use super::claims::{Claims, TokenPurpose};

/// Creates signed JWTs for each purpose.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Header carrying the configured algorithm.
    header: Header,
    access_ttl: Duration,
    email_action_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("algorithm", &self.header.alg)
            .field("access_ttl", &self.access_ttl)
            .field("email_action_ttl", &self.email_action_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig, algorithm: Algorithm) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            header: Header::new(algorithm),
            access_ttl: Duration::minutes(config.access_ttl_minutes as i64),
            email_action_ttl: Duration::minutes(config.email_token_ttl_minutes as i64),
            refresh_ttl: Duration::days(config.refresh_ttl_days as i64),
        }
    }

    /// Lifetime of tokens minted for `purpose`.
    pub fn ttl(&self, purpose: TokenPurpose) -> Duration {
        match purpose {
            TokenPurpose::Access => self.access_ttl,
            TokenPurpose::EmailAction => self.email_action_ttl,
            TokenPurpose::Refresh => self.refresh_ttl,
        }
    }

    /// Mints a token for `subject` as if issued at `issued_at`.
    pub fn issue_at(
        &self,
        subject: &str,
        purpose: TokenPurpose,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl(purpose)).timestamp(),
            jti: Uuid::new_v4(),
            purpose,
        };

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode {purpose} token: {e}")))
    }

    /// Mints a token for `subject` issued now.
    pub fn issue(&self, subject: &str, purpose: TokenPurpose) -> Result<String, AppError> {
        self.issue_at(subject, purpose, Utc::now())
    }
}
