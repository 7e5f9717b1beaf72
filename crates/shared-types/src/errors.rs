//! # Error Types
//!
//! Defines the errors raised at the POS backend boundaries.

use thiserror::Error;

/// Errors from the query and write boundaries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataError {
    /// The backend could not be reached.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The backend did not answer in time.
    #[error("Timeout")]
    Timeout,

    /// The backend answered with an error.
    #[error("Query error: {0}")]
    QueryError(String),

    /// The backend answered with something unreadable.
    #[error("Parse error: {0}")]
    ParseError(String),
}
