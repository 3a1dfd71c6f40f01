//! Token validation failures.

use thiserror::Error;

use crate::jwt::TokenPurpose;

/// Why a token was rejected. Exactly one outcome per validation call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Bad signature, malformed payload, or unknown algorithm.
    #[error("token is invalid")]
    Invalid,
    /// The token is past its expiry.
    #[error("token has expired")]
    Expired,
    /// The token was minted for a different operation.
    #[error("token purpose is {found}, expected {expected}")]
    WrongPurpose {
        expected: TokenPurpose,
        found: TokenPurpose,
    },
}
