//! Contact handlers. Every route is scoped to the calling account.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;

use crate::dto::request::{BirthdaysQuery, ContactQuery, ContactRequest};
use crate::dto::response::ContactResponse;
use crate::dto::validated;
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiPath, ApiQuery, CurrentAccount};
use crate::state::AppState;

/// GET /api/contacts/
pub async fn list_contacts(
    State(state): State<AppState>,
    caller: CurrentAccount,
    ApiQuery(query): ApiQuery<ContactQuery>,
) -> Result<Json<Vec<ContactResponse>>, ApiError> {
    let contacts = state.contacts.list(caller.id, &query.into()).await?;
    Ok(Json(contacts.into_iter().map(Into::into).collect()))
}

/// POST /api/contacts/
pub async fn create_contact(
    State(state): State<AppState>,
    caller: CurrentAccount,
    ApiJson(req): ApiJson<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    let draft = validated(req)?.into();
    let contact = state.contacts.create(caller.id, &draft).await?;
    Ok((StatusCode::CREATED, Json(contact.into())))
}

/// GET /api/contacts/birthdays
pub async fn upcoming_birthdays(
    State(state): State<AppState>,
    caller: CurrentAccount,
    ApiQuery(query): ApiQuery<BirthdaysQuery>,
) -> Result<Json<Vec<ContactResponse>>, ApiError> {
    let today = Utc::now().date_naive();
    let contacts = state
        .contacts
        .upcoming_birthdays(caller.id, query.days, today)
        .await?;
    Ok(Json(contacts.into_iter().map(Into::into).collect()))
}

/// GET /api/contacts/{id}
pub async fn get_contact(
    State(state): State<AppState>,
    caller: CurrentAccount,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ContactResponse>, ApiError> {
    Ok(Json(state.contacts.get(caller.id, id).await?.into()))
}

/// PUT /api/contacts/{id}
pub async fn update_contact(
    State(state): State<AppState>,
    caller: CurrentAccount,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<ContactRequest>,
) -> Result<Json<ContactResponse>, ApiError> {
    let draft = validated(req)?.into();
    Ok(Json(state.contacts.update(caller.id, id, &draft).await?.into()))
}

/// DELETE /api/contacts/{id}
pub async fn delete_contact(
    State(state): State<AppState>,
    caller: CurrentAccount,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ContactResponse>, ApiError> {
    Ok(Json(state.contacts.delete(caller.id, id).await?.into()))
}
