//! Account entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::role::Role;

/// A registered account that owns an address book.
///
/// The full row is serialized into the session cache, so every field
/// round-trips through JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: i64,
    /// Display name.
    pub username: String,
    /// Login email, unique and case-sensitive as stored.
    pub email: String,
    /// Argon2 password hash in PHC format.
    pub password_hash: String,
    /// Current refresh token, if the account is logged in.
    pub refresh_token: Option<String>,
    /// Whether the email address has been confirmed.
    pub confirmed: bool,
    /// Avatar image URL.
    pub avatar: Option<String>,
    /// Account role.
    pub role: Role,
}

impl Account {
    /// Check if this account has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Data required to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    /// Display name.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Default avatar URL.
    pub avatar: Option<String>,
}
