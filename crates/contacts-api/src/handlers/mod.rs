//! Request handlers grouped by resource.

pub mod auth;
pub mod contact;
pub mod health;
pub mod user;
