//! Core traits defined in `contacts-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;
