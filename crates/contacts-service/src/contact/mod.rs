//! Address book use cases.

pub mod birthdays;
pub mod service;

pub use service::ContactService;
