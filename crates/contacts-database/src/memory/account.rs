//! In-memory account store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use contacts_core::error::AppError;
use contacts_core::result::AppResult;
use contacts_entity::account::{Account, NewAccount, Role};

use crate::store::AccountStore;

/// [`AccountStore`] kept in a vector behind a lock.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<Vec<Account>>,
    writes: AtomicUsize,
    latency: Option<Duration>,
}

impl MemoryAccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency`, to exercise caller deadlines.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Number of successful row writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Change an account's role. There is no HTTP path for this.
    pub async fn set_role(&self, email: &str, role: Role) -> Option<Account> {
        self.modify(email, |a| a.role = role).await
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    async fn modify(&self, email: &str, f: impl FnOnce(&mut Account)) -> Option<Account> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.iter_mut().find(|a| a.email == email)?;
        f(account);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Some(account.clone())
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        self.delay().await;
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Account>> {
        self.delay().await;
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Account>> {
        self.delay().await;
        Ok(self.accounts.read().await.clone())
    }

    async fn insert(&self, account: &NewAccount) -> AppResult<Account> {
        self.delay().await;
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(AppError::conflict("Account already exists"));
        }
        let created = Account {
            id: accounts.last().map_or(1, |a| a.id + 1),
            username: account.username.clone(),
            email: account.email.clone(),
            password_hash: account.password_hash.clone(),
            refresh_token: None,
            confirmed: false,
            avatar: account.avatar.clone(),
            role: Role::User,
        };
        accounts.push(created.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(created)
    }

    async fn mark_confirmed(&self, email: &str) -> AppResult<Option<Account>> {
        self.delay().await;
        Ok(self.modify(email, |a| a.confirmed = true).await)
    }

    async fn update_password(
        &self,
        email: &str,
        password_hash: &str,
    ) -> AppResult<Option<Account>> {
        self.delay().await;
        Ok(self
            .modify(email, |a| a.password_hash = password_hash.to_string())
            .await)
    }

    async fn update_avatar(&self, email: &str, avatar: &str) -> AppResult<Option<Account>> {
        self.delay().await;
        Ok(self
            .modify(email, |a| a.avatar = Some(avatar.to_string()))
            .await)
    }

    async fn update_refresh_token(
        &self,
        email: &str,
        refresh_token: Option<&str>,
    ) -> AppResult<Option<Account>> {
        self.delay().await;
        Ok(self
            .modify(email, |a| a.refresh_token = refresh_token.map(str::to_string))
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contacts_core::error::ErrorKind;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            username: "u1".into(),
            email: email.into(),
            password_hash: "hash".into(),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_and_rejects_duplicates() {
        let store = MemoryAccountStore::new();
        let a = store.insert(&new_account("a@x.com")).await.unwrap();
        let b = store.insert(&new_account("b@x.com")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert!(!a.confirmed);
        assert_eq!(a.role, Role::User);

        let err = store.insert(&new_account("a@x.com")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let store = MemoryAccountStore::new();
        store.insert(&new_account("a@x.com")).await.unwrap();
        assert!(store.find_by_email("A@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_updates_count_writes() {
        let store = MemoryAccountStore::new();
        store.insert(&new_account("a@x.com")).await.unwrap();
        let updated = store.mark_confirmed("a@x.com").await.unwrap().unwrap();
        assert!(updated.confirmed);
        assert_eq!(store.write_count(), 2);

        assert!(store.mark_confirmed("none@x.com").await.unwrap().is_none());
        assert_eq!(store.write_count(), 2);
    }
}
