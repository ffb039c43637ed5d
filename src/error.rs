//! Error types for cache slot operations.

use std::fmt;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by cache slot operations.
///
/// The slot itself never fails: every variant originates in a collaborator
/// and is propagated to the caller unchanged. A missing collaborator, or a
/// retrieval that finds nothing, is represented as `None` and is never an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The retrieval collaborator failed.
    ///
    /// Raised through `get`, `refresh` and `sync`; the slot value is left
    /// exactly as it was.
    RetrievalError(String),

    /// The persistence collaborator failed.
    ///
    /// Raised through `store` and `sync`; see those operations for what
    /// remains in memory.
    PersistenceError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RetrievalError(msg) => write!(f, "Retrieval failed: {}", msg),
            Error::PersistenceError(msg) => write!(f, "Persistence failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::RetrievalError("connection refused".to_string());
        assert_eq!(err.to_string(), "Retrieval failed: connection refused");

        let err = Error::PersistenceError("disk full".to_string());
        assert_eq!(err.to_string(), "Persistence failed: disk full");
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&Error::RetrievalError("x".to_string()));
    }
}
