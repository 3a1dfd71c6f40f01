//! Token bucket rate limiter middleware.
//!
//! Clients are keyed on the TCP peer address. The `x-forwarded-for` header is
//! only consulted when the deployment says a trusted proxy sets it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use tracing::{debug, warn};

use contacts_core::config::RateLimitConfig;
use contacts_core::error::AppError;

use crate::error::ApiError;

pub const RATE_LIMITED: &str = "Rate limit exceeded. Please try again later.";

/// Checks between sweeps of refilled buckets.
const SWEEP_EVERY: u64 = 256;

/// In-memory token bucket rate limiter keyed by client address.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Client key → bucket state.
    buckets: Arc<DashMap<String, TokenBucket>>,
    /// Maximum tokens per bucket.
    max_tokens: u32,
    /// Token refill rate per second.
    refill_rate: f64,
    /// Whether `x-forwarded-for` names the client.
    trust_forwarded_for: bool,
    checks: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn refilled(&self, now: Instant, rate: f64, max: f64) -> f64 {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        (self.tokens + elapsed * rate).min(max)
    }
}

impl RateLimiter {
    /// Creates a new rate limiter.
    pub fn new(max_tokens: u32, refill_rate: f64) -> Self {
        Self {
            buckets: Arc::new(DashMap::new()),
            max_tokens,
            refill_rate,
            trust_forwarded_for: false,
            checks: Arc::new(AtomicU64::new(0)),
        }
    }

    /// A limiter allowing `requests` per minute with a burst of the same size.
    pub fn per_minute(requests: u32) -> Self {
        Self::new(requests, f64::from(requests) / 60.0)
    }

    /// The `/me` limiter described by `config`.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::per_minute(config.me_requests_per_minute)
            .trusting_forwarded_for(config.trust_forwarded_for)
    }

    /// Key on the first `x-forwarded-for` hop when `trust` is set.
    pub fn trusting_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Attempts to consume a token for the given key.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        let max = f64::from(self.max_tokens);
        let allowed = {
            let mut bucket = self
                .buckets
                .entry(key.to_string())
                .or_insert_with(|| TokenBucket {
                    tokens: max,
                    last_refill: now,
                });

            bucket.tokens = bucket.refilled(now, self.refill_rate, max);
            bucket.last_refill = now;

            if bucket.tokens >= 1.0 {
                bucket.tokens -= 1.0;
                true
            } else {
                false
            }
        };

        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.sweep(now);
        }
        allowed
    }

    /// Drops buckets that have refilled to capacity. A fresh bucket behaves
    /// the same, so nothing is lost.
    fn sweep(&self, now: Instant) {
        let max = f64::from(self.max_tokens);
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| bucket.refilled(now, self.refill_rate, max) < max);
        debug!(
            evicted = before.saturating_sub(self.buckets.len()),
            "Swept idle rate limit buckets"
        );
    }

    /// Identifies the client behind `request`.
    fn client_key(&self, request: &Request) -> String {
        if self.trust_forwarded_for
            && let Some(forwarded) = request
                .headers()
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        {
            return forwarded.to_string();
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Rejects the request with 429 when the client's bucket is empty.
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let key = limiter.client_key(&request);
    if !limiter.check(&key) {
        warn!(client = %key, path = %request.uri().path(), "Rate limit exceeded");
        return ApiError(AppError::rate_limited(RATE_LIMITED)).into_response();
    }
    next.run(request).await
}
