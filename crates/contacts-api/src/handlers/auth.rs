//! Auth handlers: signup, login, refresh, confirmation, password reset.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;

use contacts_service::TokenPair;
use contacts_service::mail::reset_password_form;

use crate::dto::request::{EmailRequest, LoginForm, ResetPasswordForm, SignupRequest};
use crate::dto::response::{AccountResponse, MessageResponse};
use crate::dto::validated;
use crate::error::ApiError;
use crate::extractors::{ApiForm, ApiJson, ApiPath, BearerToken};
use crate::state::AppState;

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let req = validated(req)?;
    let account = state
        .accounts
        .signup(&req.username, &req.email, &req.password)
        .await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> Result<Json<TokenPair>, ApiError> {
    let form = validated(form)?;
    let pair = state.accounts.login(&form.username, &form.password).await?;
    Ok(Json(pair))
}

/// GET /api/auth/refresh_token
pub async fn refresh_token(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<TokenPair>, ApiError> {
    Ok(Json(state.accounts.refresh(&token).await?))
}

/// GET /api/auth/confirmed_email/{token}
pub async fn confirmed_email(
    State(state): State<AppState>,
    ApiPath(token): ApiPath<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state.accounts.confirm_email(&token).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// POST /api/auth/request_email
pub async fn request_email(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = validated(req)?;
    let message = state.accounts.request_email(&req.email).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = validated(req)?;
    let message = state.accounts.forgot_password(&req.email).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// GET /api/auth/reset-password/{token}
pub async fn reset_password_page(ApiPath(token): ApiPath<String>) -> Html<String> {
    Html(reset_password_form(&token))
}

/// POST /api/auth/reset-password/{token}
pub async fn reset_password(
    State(state): State<AppState>,
    ApiPath(token): ApiPath<String>,
    ApiForm(form): ApiForm<ResetPasswordForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    let form = validated(form)?;
    let message = state.accounts.reset_password(&token, &form.password).await?;
    Ok(Json(MessageResponse::new(message)))
}
