//! Convenience result type alias for the contacts service.

use crate::error::AppError;

/// A specialized `Result` type for contacts operations.
pub type AppResult<T> = Result<T, AppError>;
