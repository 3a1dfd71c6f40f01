//! Account repository implementation.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use contacts_core::error::AppError;
use contacts_core::result::AppResult;
use contacts_core::with_timeout;
use contacts_entity::account::{Account, NewAccount};

use super::{DEPENDENCY, store_error, violated_constraint};
use crate::store::AccountStore;

/// Postgres-backed [`AccountStore`].
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
    timeout: Duration,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    async fn update_returning(
        &self,
        sql: &'static str,
        email: &str,
        value: Option<&str>,
        message: &'static str,
    ) -> AppResult<Option<Account>> {
        with_timeout(self.timeout, DEPENDENCY, async {
            sqlx::query_as::<_, Account>(sql)
                .bind(email)
                .bind(value)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| store_error(message, e))
        })
        .await
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        with_timeout(self.timeout, DEPENDENCY, async {
            sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| store_error("Failed to find account by email", e))
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Account>> {
        with_timeout(self.timeout, DEPENDENCY, async {
            sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| store_error("Failed to find account by id", e))
        })
        .await
    }

    async fn list(&self) -> AppResult<Vec<Account>> {
        with_timeout(self.timeout, DEPENDENCY, async {
            sqlx::query_as::<_, Account>("SELECT * FROM accounts ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| store_error("Failed to list accounts", e))
        })
        .await
    }

    async fn insert(&self, account: &NewAccount) -> AppResult<Account> {
        with_timeout(self.timeout, DEPENDENCY, async {
            sqlx::query_as::<_, Account>(
                "INSERT INTO accounts (username, email, password_hash, avatar) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING *",
            )
            .bind(&account.username)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(&account.avatar)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match violated_constraint(&e) {
                Some("accounts_email_key") => AppError::conflict("Account already exists"),
                _ => store_error("Failed to create account", e),
            })
        })
        .await
    }

    async fn mark_confirmed(&self, email: &str) -> AppResult<Option<Account>> {
        with_timeout(self.timeout, DEPENDENCY, async {
            sqlx::query_as::<_, Account>(
                "UPDATE accounts SET confirmed = TRUE WHERE email = $1 RETURNING *",
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to confirm account", e))
        })
        .await
    }

    async fn update_password(
        &self,
        email: &str,
        password_hash: &str,
    ) -> AppResult<Option<Account>> {
        self.update_returning(
            "UPDATE accounts SET password_hash = $2 WHERE email = $1 RETURNING *",
            email,
            Some(password_hash),
            "Failed to update password",
        )
        .await
    }

    async fn update_avatar(&self, email: &str, avatar: &str) -> AppResult<Option<Account>> {
        self.update_returning(
            "UPDATE accounts SET avatar = $2 WHERE email = $1 RETURNING *",
            email,
            Some(avatar),
            "Failed to update avatar",
        )
        .await
    }

    async fn update_refresh_token(
        &self,
        email: &str,
        refresh_token: Option<&str>,
    ) -> AppResult<Option<Account>> {
        self.update_returning(
            "UPDATE accounts SET refresh_token = $2 WHERE email = $1 RETURNING *",
            email,
            refresh_token,
            "Failed to update refresh token",
        )
        .await
    }
}
