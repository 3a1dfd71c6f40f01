//! In-process store implementations.
//!
//! Used by unit and integration tests and for running the API without a
//! database. They enforce the same uniqueness rules as the Postgres schema.

pub mod account;
pub mod contact;

pub use account::MemoryAccountStore;
pub use contact::MemoryContactStore;
