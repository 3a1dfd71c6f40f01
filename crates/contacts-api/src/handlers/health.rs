//! Root, health and rate-limited greeting handlers.

use axum::Json;
use axum::extract::State;

use contacts_core::error::AppError;
use tracing::warn;

use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::state::AppState;

pub const DB_NOT_CONFIGURED: &str = "DB is not configured correctly";

/// GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to root API"))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<MessageResponse>, ApiError> {
    let Some(database) = &state.database else {
        return Err(AppError::dependency_unavailable(DB_NOT_CONFIGURED).into());
    };

    match database.health_check().await {
        Ok(true) => Ok(Json(MessageResponse::new(
            "API is up and ready for the requests",
        ))),
        Ok(false) => Err(AppError::dependency_unavailable(DB_NOT_CONFIGURED).into()),
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            Err(AppError::dependency_unavailable(DB_NOT_CONFIGURED).into())
        }
    }
}

/// GET /me
pub async fn rate_limited_greeting() -> Json<MessageResponse> {
    Json(MessageResponse::new("This is my route with rate limiting."))
}
