//! Registration, login, confirmation, password reset and profile use cases.

pub mod service;

pub use service::{AccountService, TokenPair};
