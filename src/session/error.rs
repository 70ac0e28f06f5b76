//! Session store error types

use thiserror::Error;

/// Errors that can occur in a session store
#[derive(Error, Debug)]
pub enum SessionError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Role string is not one of the known roles
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SessionError::UnknownRole("admin".to_string());
        assert_eq!(err.to_string(), "Unknown role: admin");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SessionError = io_err.into();
        assert!(matches!(err, SessionError::Io(_)));
    }
}
