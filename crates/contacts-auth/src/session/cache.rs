//! Read-through cache mapping a login email to its account snapshot.
//!
//! Entries are point-in-time snapshots. They may lag a concurrent write
//! until the TTL passes or a mutation path calls [`SessionCache::invalidate`].

use std::time::Duration;

use tracing::{debug, warn};

use contacts_cache::CacheManager;
use contacts_cache::keys;
use contacts_core::error::{AppError, ErrorKind};
use contacts_core::result::AppResult;
use contacts_core::traits::CacheProvider;
use contacts_core::with_timeout;
use contacts_entity::account::Account;

const DEPENDENCY: &str = "session cache";

/// Account snapshots in the shared cache, keyed by subject email.
#[derive(Debug, Clone)]
pub struct SessionCache {
    cache: CacheManager,
    ttl: Duration,
    timeout: Duration,
}

impl SessionCache {
    /// Wraps `cache`. Every call is bounded by `timeout`.
    pub fn new(cache: CacheManager, ttl: Duration, timeout: Duration) -> Self {
        Self {
            cache,
            ttl,
            timeout,
        }
    }

    /// Returns the cached account for `subject`, if present and unexpired.
    ///
    /// A payload that does not deserialize is logged, evicted, and reported
    /// as `DependencyUnavailable`.
    pub async fn get(&self, subject: &str) -> AppResult<Option<Account>> {
        let key = keys::account_by_email(subject);
        let raw = with_timeout(self.timeout, DEPENDENCY, self.cache.get(&key)).await?;

        let Some(raw) = raw else {
            debug!(subject, "Session cache miss");
            return Ok(None);
        };

        match serde_json::from_str::<Account>(&raw) {
            Ok(account) => {
                debug!(subject, "Session cache hit");
                Ok(Some(account))
            }
            Err(e) => {
                warn!(subject, error = %e, "Malformed session cache entry");
                let evicted = with_timeout(self.timeout, DEPENDENCY, self.cache.delete(&key)).await;
                if let Err(evict) = evicted {
                    warn!(subject, error = %evict, "Failed to evict malformed cache entry");
                }
                Err(AppError::with_source(
                    ErrorKind::DependencyUnavailable,
                    "Session cache returned an unreadable entry",
                    e,
                ))
            }
        }
    }

    /// Stores `account` under `subject` for the configured TTL.
    pub async fn put(&self, subject: &str, account: &Account) -> AppResult<()> {
        let key = keys::account_by_email(subject);
        let payload = serde_json::to_string(account)?;
        with_timeout(
            self.timeout,
            DEPENDENCY,
            self.cache.set(&key, &payload, self.ttl),
        )
        .await
    }

    /// Drops the entry for `subject`. A missing entry is not an error.
    pub async fn invalidate(&self, subject: &str) -> AppResult<()> {
        let key = keys::account_by_email(subject);
        with_timeout(self.timeout, DEPENDENCY, self.cache.delete(&key)).await
    }

    /// Invalidate, logging instead of failing. Used after a committed write.
    pub async fn invalidate_quietly(&self, subject: &str) {
        if let Err(e) = self.invalidate(subject).await {
            warn!(subject, error = %e, "Failed to invalidate session cache entry");
        }
    }
}
