//! Store traits consumed by the auth and service layers.
//!
//! Implementations own their own deadlines: an elapsed call surfaces as
//! `DependencyUnavailable`, a uniqueness violation as `Conflict`. Update
//! methods return `None` when no row matched.

use async_trait::async_trait;

use contacts_core::result::AppResult;
use contacts_entity::account::{Account, NewAccount};
use contacts_entity::contact::{Contact, ContactDraft, ContactFilter};

/// Persistence for accounts.
#[async_trait]
pub trait AccountStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find an account by its exact email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Find an account by primary key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Account>>;

    /// List all accounts ordered by id.
    async fn list(&self) -> AppResult<Vec<Account>>;

    /// Insert a new unconfirmed account with the default role.
    async fn insert(&self, account: &NewAccount) -> AppResult<Account>;

    /// Set `confirmed = true`.
    async fn mark_confirmed(&self, email: &str) -> AppResult<Option<Account>>;

    /// Overwrite the password hash.
    async fn update_password(&self, email: &str, password_hash: &str)
    -> AppResult<Option<Account>>;

    /// Overwrite the avatar URL.
    async fn update_avatar(&self, email: &str, avatar: &str) -> AppResult<Option<Account>>;

    /// Overwrite or clear the stored refresh token.
    async fn update_refresh_token(
        &self,
        email: &str,
        refresh_token: Option<&str>,
    ) -> AppResult<Option<Account>>;
}

/// Persistence for contacts. Every call is scoped to the owning account.
#[async_trait]
pub trait ContactStore: Send + Sync + std::fmt::Debug + 'static {
    /// List the owner's contacts matching `filter`, ordered by id.
    async fn search(&self, owner: i64, filter: &ContactFilter) -> AppResult<Vec<Contact>>;

    /// Find one of the owner's contacts.
    async fn find_by_id(&self, owner: i64, id: i64) -> AppResult<Option<Contact>>;

    /// Insert a contact for the owner.
    async fn insert(&self, owner: i64, draft: &ContactDraft) -> AppResult<Contact>;

    /// Replace every field of one of the owner's contacts.
    async fn update(&self, owner: i64, id: i64, draft: &ContactDraft)
    -> AppResult<Option<Contact>>;

    /// Delete one of the owner's contacts, returning the removed row.
    async fn delete(&self, owner: i64, id: i64) -> AppResult<Option<Contact>>;

    /// List the owner's contacts that have a birthday set.
    async fn with_birthday(&self, owner: i64) -> AppResult<Vec<Contact>>;
}
