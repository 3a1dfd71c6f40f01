//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;

use contacts_api::AppState;
use contacts_api::middleware::rate_limit::RateLimiter;
use contacts_auth::{Gatekeeper, PasswordHasher, SessionCache, TokenService};
use contacts_cache::CacheManager;
use contacts_cache::memory::MemoryCacheProvider;
use contacts_core::config::{
    AppConfig, AuthConfig, AvatarConfig, CacheConfig, DatabaseConfig, LoggingConfig, MailConfig,
    ServerConfig,
};
use contacts_core::result::AppResult;
use contacts_database::{DatabasePool, MemoryAccountStore, MemoryContactStore};
use contacts_entity::account::Role;
use contacts_service::mail::MailTemplate;
use contacts_service::avatar::{AvatarImage, AvatarUploader};
use contacts_service::{AccountService, ContactService, Mailer, OutgoingMail};

pub const BASE_URL: &str = "http://testserver";

/// Mailer that keeps every message for inspection.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> AppResult<()> {
        self.sent.lock().await.push(mail);
        Ok(())
    }
}

impl RecordingMailer {
    /// Waits for the spawned send task and returns the newest mail to `to`
    /// matching `pick`.
    pub async fn wait_for<F>(&self, to: &str, pick: F) -> OutgoingMail
    where
        F: Fn(&MailTemplate) -> bool,
    {
        for _ in 0..200 {
            if let Some(mail) = self
                .sent
                .lock()
                .await
                .iter()
                .rev()
                .find(|m| m.to == to && pick(&m.template))
            {
                return mail.clone();
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no matching mail sent to {to}");
    }
}

/// Image host stand-in that returns a URL derived from the username.
#[derive(Debug, Default)]
pub struct StubUploader;

#[async_trait]
impl AvatarUploader for StubUploader {
    async fn upload(&self, username: &str, _image: AvatarImage) -> AppResult<String> {
        Ok(avatar_url(username))
    }
}

/// URL the stub uploader hands out for `username`.
pub fn avatar_url(username: &str) -> String {
    format!("https://img.test/avatars/{username}.png")
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Account rows, for direct edits
    pub accounts: Arc<MemoryAccountStore>,
    /// Session cache shared with the gatekeeper
    pub sessions: SessionCache,
    /// Token service shared with the app
    pub tokens: Arc<TokenService>,
    /// Captured outgoing mail
    pub mailer: Arc<RecordingMailer>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when not JSON
    pub body: Value,
    /// Raw body text
    pub text: String,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".into(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
            query_timeout_ms: 1000,
        },
        cache: CacheConfig::default(),
        auth: AuthConfig {
            jwt_secret: "integration-secret".into(),
            jwt_algorithm: "HS256".into(),
            access_ttl_minutes: 15,
            email_token_ttl_minutes: 60,
            refresh_ttl_days: 7,
            password_min_length: 6,
            session_cache_ttl_seconds: 900,
            store_timeout_ms: 1000,
        },
        mail: MailConfig {
            public_base_url: BASE_URL.into(),
            ..MailConfig::default()
        },
        avatar: AvatarConfig::default(),
        logging: LoggingConfig::default(),
    }
}

impl TestApp {
    /// Create a new test application without a database
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a test application whose health check uses `database`
    pub fn with_database(database: DatabasePool) -> Self {
        Self::build(Some(database))
    }

    fn build(database: Option<DatabasePool>) -> Self {
        let config = test_config();

        let accounts = Arc::new(MemoryAccountStore::new());
        let contacts = Arc::new(MemoryContactStore::new());
        let sessions = SessionCache::new(
            CacheManager::from_provider(Arc::new(MemoryCacheProvider::default())),
            Duration::from_secs(config.auth.session_cache_ttl_seconds),
            Duration::from_secs(1),
        );
        let tokens = Arc::new(TokenService::new(&config.auth).expect("token service"));
        let mailer = Arc::new(RecordingMailer::default());

        let gatekeeper = Arc::new(Gatekeeper::new(
            Arc::clone(&tokens),
            sessions.clone(),
            accounts.clone(),
            Duration::from_millis(config.auth.store_timeout_ms),
        ));
        let account_service = Arc::new(AccountService::new(
            accounts.clone(),
            Arc::clone(&tokens),
            PasswordHasher::new(),
            sessions.clone(),
            mailer.clone(),
            Arc::new(StubUploader),
            config.mail.public_base_url.clone(),
            config.auth.password_min_length,
        ));

        let state = AppState {
            rate_limiter: RateLimiter::from_config(&config.server.rate_limit),
            config: Arc::new(config),
            database,
            gatekeeper,
            accounts: account_service,
            contacts: Arc::new(ContactService::new(contacts)),
        };

        Self {
            router: contacts_api::build_app(state),
            accounts,
            sessions,
            tokens,
            mailer,
        }
    }

    /// Sends a request with an optional JSON body and bearer token.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        let body = match body {
            Some(b) => {
                req = req.header("Content-Type", "application/json");
                Body::from(serde_json::to_string(&b).expect("serialize body"))
            }
            None => Body::empty(),
        };
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        self.send(req.body(body).expect("build request")).await
    }

    /// Sends an urlencoded form.
    pub async fn form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencode(k), urlencode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("build request");
        self.send(req).await
    }

    /// Sends a prepared request.
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }

    pub async fn signup(&self, username: &str, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/signup",
            Some(serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            })),
            None,
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.form(
            "/api/auth/login",
            &[("username", email), ("password", password)],
        )
        .await
    }

    /// Path of the latest confirmation link mailed to `email`.
    pub async fn confirmation_path(&self, email: &str) -> String {
        let mail = self
            .mailer
            .wait_for(email, |t| matches!(t, MailTemplate::ConfirmEmail { .. }))
            .await;
        link_path(mail.template.link())
    }

    /// Path of the latest reset link mailed to `email`.
    pub async fn reset_path(&self, email: &str) -> String {
        let mail = self
            .mailer
            .wait_for(email, |t| matches!(t, MailTemplate::ResetPassword { .. }))
            .await;
        link_path(mail.template.link())
    }

    /// Signs up, confirms and logs in. Returns the access token.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> String {
        let signup = self.signup(username, email, password).await;
        assert_eq!(signup.status, StatusCode::CREATED, "{}", signup.text);

        let confirm = self
            .request("GET", &self.confirmation_path(email).await, None, None)
            .await;
        assert_eq!(confirm.status, StatusCode::OK, "{}", confirm.text);

        let login = self.login(email, password).await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.text);
        login.body["access_token"]
            .as_str()
            .expect("access token")
            .to_string()
    }

    /// Grants the admin role and drops the cached snapshot.
    pub async fn promote(&self, email: &str) {
        self.accounts
            .set_role(email, Role::Admin)
            .await
            .expect("account exists");
        self.sessions.invalidate(email).await.expect("invalidate");
    }
}

fn link_path(link: &str) -> String {
    link.strip_prefix(BASE_URL)
        .expect("link uses the public base url")
        .to_string()
}

fn urlencode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}
