//! Request and response bodies.

pub mod request;
pub mod response;

use validator::Validate;

use crate::error::ApiError;

/// Runs `validator` rules on a request body.
pub fn validated<T: Validate>(body: T) -> Result<T, ApiError> {
    body.validate()?;
    Ok(body)
}
