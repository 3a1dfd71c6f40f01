//! In-memory contact store.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use contacts_core::error::AppError;
use contacts_core::result::AppResult;
use contacts_entity::contact::{Contact, ContactDraft, ContactFilter};

use crate::repositories::contact::DUPLICATE_CONTACT;
use crate::store::ContactStore;

/// [`ContactStore`] kept in a vector behind a lock.
#[derive(Debug, Default)]
pub struct MemoryContactStore {
    contacts: RwLock<Vec<Contact>>,
    next_id: AtomicI64,
}

impl MemoryContactStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Mirrors the `(account_id, email)` and `(account_id, phone)` constraints.
fn collides(existing: &[Contact], owner: i64, skip: Option<i64>, draft: &ContactDraft) -> bool {
    existing.iter().any(|c| {
        c.account_id == owner
            && Some(c.id) != skip
            && (c.email == draft.email || c.phone == draft.phone)
    })
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn search(&self, owner: i64, filter: &ContactFilter) -> AppResult<Vec<Contact>> {
        let contacts = self.contacts.read().await;
        Ok(contacts
            .iter()
            .filter(|c| c.account_id == owner && filter.matches(c))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, owner: i64, id: i64) -> AppResult<Option<Contact>> {
        let contacts = self.contacts.read().await;
        Ok(contacts
            .iter()
            .find(|c| c.id == id && c.account_id == owner)
            .cloned())
    }

    async fn insert(&self, owner: i64, draft: &ContactDraft) -> AppResult<Contact> {
        let mut contacts = self.contacts.write().await;
        if collides(&contacts, owner, None, draft) {
            return Err(AppError::conflict(DUPLICATE_CONTACT));
        }
        let contact = Contact {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            birthday: draft.birthday,
            account_id: owner,
        };
        contacts.push(contact.clone());
        Ok(contact)
    }

    async fn update(
        &self,
        owner: i64,
        id: i64,
        draft: &ContactDraft,
    ) -> AppResult<Option<Contact>> {
        let mut contacts = self.contacts.write().await;
        if !contacts.iter().any(|c| c.id == id && c.account_id == owner) {
            return Ok(None);
        }
        if collides(&contacts, owner, Some(id), draft) {
            return Err(AppError::conflict(DUPLICATE_CONTACT));
        }
        let contact = contacts
            .iter_mut()
            .find(|c| c.id == id && c.account_id == owner)
            .map(|c| {
                c.first_name = draft.first_name.clone();
                c.last_name = draft.last_name.clone();
                c.email = draft.email.clone();
                c.phone = draft.phone.clone();
                c.birthday = draft.birthday;
                c.clone()
            });
        Ok(contact)
    }

    async fn delete(&self, owner: i64, id: i64) -> AppResult<Option<Contact>> {
        let mut contacts = self.contacts.write().await;
        let position = contacts
            .iter()
            .position(|c| c.id == id && c.account_id == owner);
        Ok(position.map(|p| contacts.remove(p)))
    }

    async fn with_birthday(&self, owner: i64) -> AppResult<Vec<Contact>> {
        let contacts = self.contacts.read().await;
        Ok(contacts
            .iter()
            .filter(|c| c.account_id == owner && c.birthday.is_some())
            .cloned()
            .collect())
    }
}
