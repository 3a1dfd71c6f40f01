//! Contact entity model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An entry in an account's address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    /// Unique contact identifier.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email, unique per owning account.
    pub email: String,
    /// Phone number, unique per owning account.
    pub phone: String,
    /// Date of birth.
    pub birthday: Option<NaiveDate>,
    /// Owning account.
    pub account_id: i64,
}

/// Field values for creating or replacing a contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthday: Option<NaiveDate>,
}

/// Optional case-insensitive substring filters for listing contacts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl ContactFilter {
    /// Whether `contact` matches every filter that is set.
    pub fn matches(&self, contact: &Contact) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            match needle {
                Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
                None => true,
            }
        }
        contains(&contact.first_name, &self.first_name)
            && contains(&contact.last_name, &self.last_name)
            && contains(&contact.email, &self.email)
    }
}
