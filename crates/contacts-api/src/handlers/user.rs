//! User handlers.

use axum::Json;
use axum::extract::State;

use contacts_core::error::{AppError, ErrorKind};
use contacts_entity::account::Role;
use contacts_service::avatar::AvatarImage;

use crate::dto::response::AccountResponse;
use crate::error::ApiError;
use crate::extractors::{ApiMultipart, ApiPath, CurrentAccount};
use crate::state::AppState;

/// GET /api/users/
pub async fn list_users(
    State(state): State<AppState>,
    _caller: CurrentAccount,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let users = state.accounts.list_users().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// GET /api/users/me
pub async fn me(caller: CurrentAccount) -> Json<AccountResponse> {
    Json(caller.0.into())
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _caller: CurrentAccount,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<AccountResponse>, ApiError> {
    if id < 1 {
        return Err(AppError::invalid("User id must be at least 1").into());
    }
    Ok(Json(state.accounts.get_user(id).await?.into()))
}

/// PATCH /api/users/avatar
///
/// Multipart upload with the image in the `file` field. Admin only.
pub async fn update_avatar(
    State(state): State<AppState>,
    caller: CurrentAccount,
    ApiMultipart(mut multipart): ApiMultipart,
) -> Result<Json<AccountResponse>, ApiError> {
    state
        .gatekeeper
        .require_role(&caller, Role::Admin, "change the default avatar")?;

    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Invalid, "Malformed multipart body", e))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("avatar").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(|e| {
            AppError::with_source(ErrorKind::Invalid, "Could not read uploaded file", e)
        })?;
        image = Some(AvatarImage {
            file_name,
            content_type,
            data,
        });
        break;
    }

    let image = image.ok_or_else(|| AppError::invalid("Missing file field"))?;
    let updated = state.accounts.update_avatar(&caller, image).await?;
    Ok(Json(updated.into()))
}
