//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use contacts_auth::Gatekeeper;
use contacts_core::config::AppConfig;
use contacts_database::DatabasePool;
use contacts_service::{AccountService, ContactService};

use crate::middleware::rate_limit::RateLimiter;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL pool, absent when running against in-memory stores
    pub database: Option<DatabasePool>,
    /// Resolves bearer tokens to accounts and checks roles
    pub gatekeeper: Arc<Gatekeeper>,
    /// Signup, login, confirmation, reset and profile use cases
    pub accounts: Arc<AccountService>,
    /// Address book use cases
    pub contacts: Arc<ContactService>,
    /// Limiter for the top-level `/me` route
    pub rate_limiter: RateLimiter,
}
