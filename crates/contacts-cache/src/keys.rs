//! Cache key builders.
//!
//! The Redis provider adds its configured prefix on top of these.

/// Cache key for the session snapshot of an account, by login email.
pub fn account_by_email(email: &str) -> String {
    format!("account:{email}")
}
