//! Contact CRUD, search and birthdays, scoped to the owning account.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use contacts_core::error::AppError;
use contacts_core::result::AppResult;
use contacts_database::ContactStore;
use contacts_entity::contact::{Contact, ContactDraft, ContactFilter};

use super::birthdays::{MAX_WINDOW_DAYS, is_upcoming, next_birthday};

/// Detail for a contact the caller does not own or that does not exist.
pub const CONTACT_NOT_FOUND: &str = "Contact not found";

/// Address book operations.
#[derive(Debug, Clone)]
pub struct ContactService {
    contacts: Arc<dyn ContactStore>,
}

impl ContactService {
    /// Creates a new contact service.
    pub fn new(contacts: Arc<dyn ContactStore>) -> Self {
        Self { contacts }
    }

    /// Lists the owner's contacts matching every set filter.
    pub async fn list(&self, owner: i64, filter: &ContactFilter) -> AppResult<Vec<Contact>> {
        self.contacts.search(owner, filter).await
    }

    /// Fetches one of the owner's contacts.
    pub async fn get(&self, owner: i64, id: i64) -> AppResult<Contact> {
        self.contacts
            .find_by_id(owner, id)
            .await?
            .ok_or_else(|| AppError::not_found(CONTACT_NOT_FOUND))
    }

    /// Creates a contact. A duplicate email or phone is `Conflict`.
    pub async fn create(&self, owner: i64, draft: &ContactDraft) -> AppResult<Contact> {
        let contact = self.contacts.insert(owner, draft).await?;
        info!(owner, contact_id = contact.id, "Contact created");
        Ok(contact)
    }

    /// Replaces every field of a contact.
    pub async fn update(&self, owner: i64, id: i64, draft: &ContactDraft) -> AppResult<Contact> {
        self.contacts
            .update(owner, id, draft)
            .await?
            .ok_or_else(|| AppError::not_found(CONTACT_NOT_FOUND))
    }

    /// Deletes a contact and returns it.
    pub async fn delete(&self, owner: i64, id: i64) -> AppResult<Contact> {
        let contact = self
            .contacts
            .delete(owner, id)
            .await?
            .ok_or_else(|| AppError::not_found(CONTACT_NOT_FOUND))?;
        info!(owner, contact_id = id, "Contact deleted");
        Ok(contact)
    }

    /// Contacts whose next birthday is within `days` of `today`, soonest first.
    pub async fn upcoming_birthdays(
        &self,
        owner: i64,
        days: i64,
        today: NaiveDate,
    ) -> AppResult<Vec<Contact>> {
        if !(0..=MAX_WINDOW_DAYS).contains(&days) {
            return Err(AppError::invalid(format!(
                "days must be between 0 and {MAX_WINDOW_DAYS}"
            )));
        }

        let mut upcoming: Vec<Contact> = self
            .contacts
            .with_birthday(owner)
            .await?
            .into_iter()
            .filter(|c| c.birthday.is_some_and(|b| is_upcoming(b, today, days)))
            .collect();
        upcoming.sort_by_key(|c| c.birthday.and_then(|b| next_birthday(b, today)));
        Ok(upcoming)
    }
}
