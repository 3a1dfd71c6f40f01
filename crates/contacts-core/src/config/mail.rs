//! Outbound mail configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// SMTP settings for confirmation and reset emails.
///
/// When `enabled` is false, mail is written to the log instead of sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Whether to deliver mail over SMTP.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP relay host.
    #[serde(default)]
    pub smtp_host: String,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP login.
    #[serde(default)]
    pub username: String,
    /// SMTP password.
    #[serde(default)]
    pub password: String,
    /// Sender address.
    #[serde(default)]
    pub from: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Use STARTTLS rather than implicit TLS.
    #[serde(default = "default_starttls")]
    pub starttls: bool,
    /// Base URL used when building links in emails.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from: String::new(),
            from_name: default_from_name(),
            starttls: default_starttls(),
            public_base_url: default_public_base_url(),
        }
    }
}

impl MailConfig {
    /// Checks that SMTP delivery has everything it needs.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.smtp_host.is_empty() || self.from.is_empty() {
            return Err(AppError::configuration(
                "mail.smtp_host and mail.from are required when mail is enabled",
            ));
        }
        if self.username.is_empty() || self.password.is_empty() {
            return Err(AppError::configuration(
                "mail.username and mail.password are required when mail is enabled",
            ));
        }
        Ok(())
    }
}

fn default_smtp_port() -> u16 {
    465
}

fn default_from_name() -> String {
    "Contacts App".to_string()
}

fn default_starttls() -> bool {
    false
}

fn default_public_base_url() -> String {
    "http://localhost:8000".to_string()
}
