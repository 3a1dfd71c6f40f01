//! Token issuance and validation for every token purpose.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use jsonwebtoken::Algorithm;

use contacts_core::config::AuthConfig;
use contacts_core::error::AppError;

use super::claims::TokenPurpose;
use super::decoder::JwtDecoder;
use super::encoder::JwtEncoder;
use crate::error::TokenError;

/// Issues and validates purpose-tagged tokens. Pure CPU, no I/O.
#[derive(Debug, Clone)]
pub struct TokenService {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl TokenService {
    /// Builds the service, rejecting an empty secret or a non-HMAC algorithm.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        config.validate()?;
        let algorithm = Algorithm::from_str(&config.jwt_algorithm).map_err(|e| {
            AppError::with_source(
                contacts_core::ErrorKind::Configuration,
                format!("Unknown JWT algorithm '{}'", config.jwt_algorithm),
                e,
            )
        })?;

        Ok(Self {
            encoder: JwtEncoder::new(config, algorithm),
            decoder: JwtDecoder::new(config, algorithm),
        })
    }

    /// Short-lived bearer credential.
    pub fn issue_access(&self, subject: &str) -> Result<String, AppError> {
        self.encoder.issue(subject, TokenPurpose::Access)
    }

    /// Token embedded in confirmation and password reset links.
    pub fn issue_email_action(&self, subject: &str) -> Result<String, AppError> {
        self.encoder.issue(subject, TokenPurpose::EmailAction)
    }

    /// Long-lived token exchanged for a new pair.
    pub fn issue_refresh(&self, subject: &str) -> Result<String, AppError> {
        self.encoder.issue(subject, TokenPurpose::Refresh)
    }

    /// Mints a token with an explicit issue time.
    pub fn issue_at(
        &self,
        subject: &str,
        purpose: TokenPurpose,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        self.encoder.issue_at(subject, purpose, issued_at)
    }

    /// Returns the subject of `token` if it is valid for `required`.
    pub fn validate(&self, token: &str, required: TokenPurpose) -> Result<String, TokenError> {
        self.decoder.validate(token, required).map(|claims| claims.sub)
    }
}
