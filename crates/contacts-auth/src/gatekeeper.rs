//! Resolves the caller of a protected route.
//!
//! `resolve` validates the bearer token for the `access` purpose before it
//! looks at the cache, so an expired token is refused even while a snapshot
//! for its subject is still cached. A bad token and a vanished account give
//! the caller the same `Unauthenticated` error; the token failure is kept as
//! the error source.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use contacts_core::error::{AppError, ErrorKind};
use contacts_core::result::AppResult;
use contacts_core::with_timeout;
use contacts_database::AccountStore;
use contacts_entity::account::{Account, Role};

use crate::jwt::{TokenPurpose, TokenService};
use crate::session::SessionCache;

/// Detail returned for every authentication failure.
pub const CREDENTIALS_ERROR: &str = "Could not validate credentials";

/// Token service, session cache and account store composed into one check.
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    tokens: Arc<TokenService>,
    sessions: SessionCache,
    accounts: Arc<dyn AccountStore>,
    store_timeout: Duration,
}

impl Gatekeeper {
    /// Creates a gatekeeper over explicitly constructed collaborators.
    pub fn new(
        tokens: Arc<TokenService>,
        sessions: SessionCache,
        accounts: Arc<dyn AccountStore>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            tokens,
            sessions,
            accounts,
            store_timeout,
        }
    }

    /// Returns the account a bearer access token belongs to.
    pub async fn resolve(&self, bearer: &str) -> AppResult<Account> {
        let subject = self
            .tokens
            .validate(bearer, TokenPurpose::Access)
            .map_err(|e| AppError::with_source(ErrorKind::Unauthenticated, CREDENTIALS_ERROR, e))?;

        if let Some(account) = self.sessions.get(&subject).await? {
            return Ok(account);
        }

        let account = with_timeout(
            self.store_timeout,
            "account store",
            self.accounts.find_by_email(&subject),
        )
        .await?
        .ok_or_else(|| {
            debug!(subject = %subject, "Token subject has no account");
            AppError::unauthenticated(CREDENTIALS_ERROR)
        })?;

        if let Err(e) = self.sessions.put(&subject, &account).await {
            warn!(subject = %subject, error = %e, "Failed to populate session cache");
        }
        Ok(account)
    }

    /// Fails with `Forbidden` unless `account` holds `role` or is an admin.
    ///
    /// `action` completes the sentence "Only {role} users can ...".
    pub fn require_role(&self, account: &Account, role: Role, action: &str) -> AppResult<()> {
        if account.role == role || account.is_admin() {
            return Ok(());
        }
        Err(AppError::forbidden(format!("Only {role} users can {action}.")))
    }

    /// The session cache this gatekeeper reads from.
    pub fn sessions(&self) -> &SessionCache {
        &self.sessions
    }
}
