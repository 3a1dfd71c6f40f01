//! Contact repository implementation.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use contacts_core::error::AppError;
use contacts_core::result::AppResult;
use contacts_core::with_timeout;
use contacts_entity::contact::{Contact, ContactDraft, ContactFilter};

use super::{DEPENDENCY, store_error, violated_constraint};
use crate::store::ContactStore;

/// Detail returned when either per-owner uniqueness constraint fails.
pub const DUPLICATE_CONTACT: &str = "Email or phone number already exists.";

/// Postgres-backed [`ContactStore`].
#[derive(Debug, Clone)]
pub struct ContactRepository {
    pool: PgPool,
    timeout: Duration,
}

impl ContactRepository {
    /// Create a new contact repository.
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

fn write_error(message: &'static str, e: sqlx::Error) -> AppError {
    match violated_constraint(&e) {
        Some("uix_account_email") | Some("uix_account_phone") => {
            AppError::conflict(DUPLICATE_CONTACT)
        }
        _ => store_error(message, e),
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside ILIKE.
fn like_pattern(needle: &Option<String>) -> Option<String> {
    needle.as_ref().map(|n| {
        let escaped = n
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{escaped}%")
    })
}

#[async_trait]
impl ContactStore for ContactRepository {
    async fn search(&self, owner: i64, filter: &ContactFilter) -> AppResult<Vec<Contact>> {
        with_timeout(self.timeout, DEPENDENCY, async {
            sqlx::query_as::<_, Contact>(
                "SELECT * FROM contacts \
                 WHERE account_id = $1 \
                   AND ($2::text IS NULL OR first_name ILIKE $2) \
                   AND ($3::text IS NULL OR last_name ILIKE $3) \
                   AND ($4::text IS NULL OR email ILIKE $4) \
                 ORDER BY id",
            )
            .bind(owner)
            .bind(like_pattern(&filter.first_name))
            .bind(like_pattern(&filter.last_name))
            .bind(like_pattern(&filter.email))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("Failed to search contacts", e))
        })
        .await
    }

    async fn find_by_id(&self, owner: i64, id: i64) -> AppResult<Option<Contact>> {
        with_timeout(self.timeout, DEPENDENCY, async {
            sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1 AND account_id = $2")
                .bind(id)
                .bind(owner)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| store_error("Failed to find contact", e))
        })
        .await
    }

    async fn insert(&self, owner: i64, draft: &ContactDraft) -> AppResult<Contact> {
        with_timeout(self.timeout, DEPENDENCY, async {
            sqlx::query_as::<_, Contact>(
                "INSERT INTO contacts (first_name, last_name, email, phone, birthday, account_id) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 RETURNING *",
            )
            .bind(&draft.first_name)
            .bind(&draft.last_name)
            .bind(&draft.email)
            .bind(&draft.phone)
            .bind(draft.birthday)
            .bind(owner)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error("Failed to create contact", e))
        })
        .await
    }

    async fn update(
        &self,
        owner: i64,
        id: i64,
        draft: &ContactDraft,
    ) -> AppResult<Option<Contact>> {
        with_timeout(self.timeout, DEPENDENCY, async {
            sqlx::query_as::<_, Contact>(
                "UPDATE contacts SET first_name = $3, last_name = $4, email = $5, \
                                     phone = $6, birthday = $7 \
                 WHERE id = $1 AND account_id = $2 \
                 RETURNING *",
            )
            .bind(id)
            .bind(owner)
            .bind(&draft.first_name)
            .bind(&draft.last_name)
            .bind(&draft.email)
            .bind(&draft.phone)
            .bind(draft.birthday)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error("Failed to update contact", e))
        })
        .await
    }

    async fn delete(&self, owner: i64, id: i64) -> AppResult<Option<Contact>> {
        with_timeout(self.timeout, DEPENDENCY, async {
            sqlx::query_as::<_, Contact>(
                "DELETE FROM contacts WHERE id = $1 AND account_id = $2 RETURNING *",
            )
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to delete contact", e))
        })
        .await
    }

    async fn with_birthday(&self, owner: i64) -> AppResult<Vec<Contact>> {
        with_timeout(self.timeout, DEPENDENCY, async {
            sqlx::query_as::<_, Contact>(
                "SELECT * FROM contacts WHERE account_id = $1 AND birthday IS NOT NULL ORDER BY id",
            )
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("Failed to list contacts with birthdays", e))
        })
        .await
    }
}
