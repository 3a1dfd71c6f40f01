//! JWT token encoding, decoding, and claims management.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod service;

pub use claims::{Claims, TokenPurpose};
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
pub use service::TokenService;
