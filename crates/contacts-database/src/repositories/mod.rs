//! PostgreSQL implementations of the store traits.

pub mod account;
pub mod contact;

pub use account::AccountRepository;
pub use contact::ContactRepository;

use contacts_core::error::{AppError, ErrorKind};

/// Name the dependency in timeout errors raised by these repositories.
pub(crate) const DEPENDENCY: &str = "database";

/// Wrap an sqlx failure that is not a constraint violation.
pub(crate) fn store_error(message: &'static str, e: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::DependencyUnavailable, message, e)
}

/// Return the violated constraint name, if `e` is a constraint violation.
pub(crate) fn violated_constraint(e: &sqlx::Error) -> Option<&str> {
    match e {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}
