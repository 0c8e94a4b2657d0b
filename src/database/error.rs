use error_stack::Report;
use thiserror::Error;

/// Database related errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The configured connection url could not be parsed.
    #[error("invalid connection url")]
    InvalidUrl,
    /// Anything else reported by the driver. The driver error is
    /// kept as the report's source.
    #[error("received a database error")]
    Internal,
    /// The database is currently in read mode (most likely due to
    /// maintenance) and should not perform any writes.
    #[error("database is currently in read mode")]
    Readonly,
    /// A write was rejected by a unique index.
    #[error("unique constraint violated")]
    UniqueViolation,
    /// The pool does not have a reliable connection to the database.
    #[error("unhealthy database pool")]
    UnhealthyPool,
    #[error("could not run database migrations")]
    Migration,
}

/// Lazily typed [`std::result::Result`] but the error generic
/// is filled up with [a database error](Error).
pub type Result<T> = error_stack::Result<T, Error>;

const UNIQUE_VIOLATION: &str = "23505";

/// Converts from a generic [sqlx] result into a [database compatible error](Error).
pub trait ErrorExt<T> {
    fn into_db_error(self) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, sqlx::Error> {
    fn into_db_error(self) -> Result<T> {
        self.map_err(|e| {
            let context = match &e {
                sqlx::Error::Database(err) if err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                    Error::UniqueViolation
                }
                sqlx::Error::Database(err) if err.message().ends_with("read-only transaction") => {
                    Error::Readonly
                }
                sqlx::Error::PoolTimedOut | sqlx::Error::Io(..) => Error::UnhealthyPool,
                _ => Error::Internal,
            };
            Report::new(e).change_context(context)
        })
    }
}

/// Helpers for inspecting a `Report<Error>` without matching on
/// [`Report::current_context`] everywhere.
pub trait ErrorExt2 {
    fn is_unhealthy(&self) -> bool;
    fn is_unique_violation(&self) -> bool;
}

impl ErrorExt2 for Report<Error> {
    fn is_unhealthy(&self) -> bool {
        matches!(self.current_context(), Error::UnhealthyPool)
    }

    fn is_unique_violation(&self) -> bool {
        matches!(self.current_context(), Error::UniqueViolation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_database_is_unhealthy() {
        let error = Err::<(), _>(sqlx::Error::PoolTimedOut)
            .into_db_error()
            .unwrap_err();
        assert!(error.is_unhealthy());

        let error = Err::<(), _>(sqlx::Error::RowNotFound)
            .into_db_error()
            .unwrap_err();
        assert_eq!(error.current_context(), &Error::Internal);
        assert!(!error.is_unhealthy());
    }
}
