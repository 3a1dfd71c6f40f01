//! JWT claims structure shared by every token the service issues.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account email.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token id, so two tokens minted in the same second differ.
    pub jti: Uuid,
    /// The operation this token may authorize.
    pub purpose: TokenPurpose,
}

/// Restricts which operation may consume a token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    /// Bearer credential for API requests.
    Access,
    /// Email confirmation and password reset links.
    EmailAction,
    /// Exchanged for a new token pair.
    Refresh,
}

impl TokenPurpose {
    /// Return the purpose as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::EmailAction => "email_action",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Claims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
