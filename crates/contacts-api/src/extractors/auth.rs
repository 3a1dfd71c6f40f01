//! Bearer-token extractors.
//!
//! [`CurrentAccount`] resolves the access token through the gatekeeper.
//! [`BearerToken`] only pulls the raw token, for routes that validate a
//! different token purpose themselves.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use contacts_core::error::AppError;
use contacts_entity::account::Account;

use crate::error::ApiError;
use crate::state::AppState;

pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// The account behind a valid access token.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl std::ops::Deref for CurrentAccount {
    type Target = Account;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The raw token from an `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

fn bearer(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError(AppError::unauthenticated(NOT_AUTHENTICATED)))?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or_else(|| ApiError(AppError::unauthenticated(NOT_AUTHENTICATED)))?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(ApiError(AppError::unauthenticated(NOT_AUTHENTICATED)));
    }
    Ok(token.trim())
}

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer(parts).map(|t| BearerToken(t.to_string()))
    }
}

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer(parts)?;
        let account = state.gatekeeper.resolve(token).await?;
        Ok(CurrentAccount(account))
    }
}
