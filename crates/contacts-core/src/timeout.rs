//! Deadline wrapper for calls into the store, the cache, and outbound services.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::AppError;
use crate::result::AppResult;

/// Runs `fut` with a deadline.
///
/// An elapsed deadline is reported as `DependencyUnavailable` and the call is
/// not retried; an outer layer may retry the whole request.
pub async fn with_timeout<T, F>(limit: Duration, dependency: &'static str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                dependency,
                timeout_ms = limit.as_millis() as u64,
                "Dependency call timed out"
            );
            Err(AppError::dependency_unavailable(format!(
                "{dependency} did not respond in time"
            )))
        }
    }
}
