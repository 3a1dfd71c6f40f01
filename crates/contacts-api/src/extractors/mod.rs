//! Custom Axum extractors.

pub mod auth;
pub mod body;

pub use auth::{BearerToken, CurrentAccount};
pub use body::{ApiForm, ApiJson, ApiMultipart, ApiPath, ApiQuery};
