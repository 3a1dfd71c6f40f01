//! Contacts server.
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use contacts_api::AppState;
use contacts_api::middleware::rate_limit::RateLimiter;
use contacts_auth::{Gatekeeper, PasswordHasher, SessionCache, TokenService};
use contacts_cache::CacheManager;
use contacts_core::config::AppConfig;
use contacts_core::error::AppError;
use contacts_database::{
    AccountRepository, AccountStore, ContactRepository, ContactStore, DatabasePool,
};
use contacts_service::{
    AccountService, AvatarUploader, CloudinaryUploader, ContactService, DisabledUploader,
    LogMailer, Mailer, SmtpMailer,
};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `config/` and `CONTACTS__*` environment variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("CONTACTS_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting contacts server v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let database = DatabasePool::connect(&config.database).await?;
    contacts_database::migration::run_migrations(database.pool()).await?;

    let store_timeout = Duration::from_millis(config.database.query_timeout_ms);
    let accounts: Arc<dyn AccountStore> = Arc::new(AccountRepository::new(
        database.pool().clone(),
        store_timeout,
    ));
    let contacts: Arc<dyn ContactStore> = Arc::new(ContactRepository::new(
        database.pool().clone(),
        store_timeout,
    ));

    // ── Step 2: Initialize cache ─────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing cache...");
    let cache = CacheManager::new(&config.cache).await?;
    let sessions = SessionCache::new(
        cache,
        Duration::from_secs(config.auth.session_cache_ttl_seconds),
        Duration::from_millis(config.cache.operation_timeout_ms),
    );

    // ── Step 3: Initialize auth system ───────────────────────────
    let tokens = Arc::new(TokenService::new(&config.auth)?);
    let gatekeeper = Arc::new(Gatekeeper::new(
        Arc::clone(&tokens),
        sessions.clone(),
        Arc::clone(&accounts),
        Duration::from_millis(config.auth.store_timeout_ms),
    ));

    // ── Step 4: Outbound integrations ────────────────────────────
    let mailer: Arc<dyn Mailer> = if config.mail.enabled {
        tracing::info!(host = %config.mail.smtp_host, "Using SMTP mailer");
        Arc::new(SmtpMailer::new(&config.mail)?)
    } else {
        tracing::warn!("Mail disabled, outgoing mail will only be logged");
        Arc::new(LogMailer)
    };

    let avatars: Arc<dyn AvatarUploader> = if config.avatar.enabled {
        Arc::new(CloudinaryUploader::new(
            &config.avatar,
            Duration::from_secs(config.server.request_timeout_seconds),
        )?)
    } else {
        Arc::new(DisabledUploader)
    };

    // ── Step 5: Initialize services ──────────────────────────────
    let account_service = Arc::new(AccountService::new(
        Arc::clone(&accounts),
        tokens,
        PasswordHasher::new(),
        sessions,
        mailer,
        avatars,
        config.mail.public_base_url.clone(),
        config.auth.password_min_length,
    ));
    let contact_service = Arc::new(ContactService::new(contacts));

    // ── Step 6: Build and start HTTP server ──────────────────────
    let state = AppState {
        rate_limiter: RateLimiter::from_config(&config.server.rate_limit),
        config: Arc::new(config.clone()),
        database: Some(database.clone()),
        gatekeeper,
        accounts: account_service,
        contacts: contact_service,
    };

    let app = contacts_api::build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Contacts server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    database.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
