//! Unified error type for the data layer

use thiserror::Error;

use super::filters::{FilterError, RegistryError};
use super::sqlite::SqliteError;

/// Error from any part of the data layer
#[derive(Error, Debug)]
pub enum DataError {
    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] SqliteError),

    /// Filter request rejected while compiling
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Invalid filter registration
    #[error("Filter registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl DataError {
    /// Whether the caller, rather than the server, caused the error
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Filter(e) if e.is_client_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error_is_transparent() {
        let err: DataError =
            FilterError::invalid_value("total_amount", "abc", "expected a number").into();
        assert_eq!(
            err.to_string(),
            "Invalid value 'abc' for filter 'total_amount': expected a number"
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn test_sqlite_error_is_server_side() {
        let err: DataError = SqliteError::MigrationFailed {
            version: 3,
            name: "unknown".to_string(),
            error: "boom".to_string(),
        }
        .into();
        assert!(!err.is_client_error());
        assert!(err.to_string().starts_with("SQLite error:"));
    }
}
