//! # contacts-core
//!
//! Core crate for the contacts service. Contains the configuration
//! schemas, the cache provider trait, the dependency timeout helper,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other contacts crates.

pub mod config;
pub mod error;
pub mod result;
pub mod timeout;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use timeout::with_timeout;
