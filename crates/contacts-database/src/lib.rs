//! # contacts-database
//!
//! PostgreSQL connection management, the [`AccountStore`] and
//! [`ContactStore`] traits consumed by the auth and service layers, and
//! their Postgres and in-memory implementations.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::{MemoryAccountStore, MemoryContactStore};
pub use repositories::{AccountRepository, ContactRepository};
pub use store::{AccountStore, ContactStore};
