//! # contacts-auth
//!
//! Authentication for the contacts service.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing and verification
//! - `jwt`: signed, expiring tokens carrying a subject and a purpose tag
//! - `session`: read-through cache of resolved accounts keyed by email
//! - `gatekeeper`: resolves a bearer token to the calling account and
//!   performs role checks

pub mod error;
pub mod gatekeeper;
pub mod jwt;
pub mod password;
pub mod session;

pub use error::TokenError;
pub use gatekeeper::Gatekeeper;
pub use jwt::{Claims, TokenPurpose, TokenService};
pub use password::PasswordHasher;
pub use session::SessionCache;
