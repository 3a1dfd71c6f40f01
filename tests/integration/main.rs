//! Integration tests driving the full router against in-memory stores,
//! the Moka cache and a recording mailer.

mod helpers;

mod auth_test;
mod contact_test;
mod user_test;
