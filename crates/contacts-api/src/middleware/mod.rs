//! HTTP middleware.

pub mod cors;
pub mod logging;
pub mod rate_limit;
