//! Session cache of resolved accounts.

pub mod cache;

pub use cache::SessionCache;
