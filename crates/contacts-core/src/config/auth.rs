//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Signing algorithms accepted for `jwt_algorithm`.
const HMAC_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing. Must be supplied externally.
    pub jwt_secret: String,
    /// HMAC signing algorithm name.
    #[serde(default = "default_algorithm")]
    pub jwt_algorithm: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Confirmation and reset token TTL in minutes.
    #[serde(default = "default_email_token_ttl")]
    pub email_token_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Lifetime of a cached account snapshot in seconds.
    #[serde(default = "default_session_cache_ttl")]
    pub session_cache_ttl_seconds: u64,
    /// Deadline for a single store or cache call made by the gatekeeper.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
}

impl AuthConfig {
    /// Rejects an empty secret and non-HMAC algorithms.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must be set"));
        }
        if !HMAC_ALGORITHMS.contains(&self.jwt_algorithm.as_str()) {
            return Err(AppError::configuration(format!(
                "auth.jwt_algorithm '{}' is not supported, expected one of {:?}",
                self.jwt_algorithm, HMAC_ALGORITHMS
            )));
        }
        Ok(())
    }
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_email_token_ttl() -> u64 {
    60
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_password_min() -> usize {
    6
}

fn default_session_cache_ttl() -> u64 {
    900
}

fn default_store_timeout() -> u64 {
    3000
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn config(secret: &str, algorithm: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_algorithm: algorithm.to_string(),
            access_ttl_minutes: default_access_ttl(),
            email_token_ttl_minutes: default_email_token_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            password_min_length: default_password_min(),
            session_cache_ttl_seconds: default_session_cache_ttl(),
            store_timeout_ms: default_store_timeout(),
        }
    }

    #[test]
    fn test_empty_secret_rejected() {
        let err = config("  ", "HS256").validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_asymmetric_algorithm_rejected() {
        assert!(config("secret", "RS256").validate().is_err());
        assert!(config("secret", "HS512").validate().is_ok());
    }
}
