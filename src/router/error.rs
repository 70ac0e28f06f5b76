//! Role router error types

use thiserror::Error;

/// Errors that can occur while routing
#[derive(Error, Debug)]
pub enum RouterError {
    /// Logical page key is not one of dashboard/community/workspaces/profile
    #[error("Unknown page: {0}")]
    UnknownPage(String),

    /// Session store error
    #[error("Session error: {0}")]
    Session(#[from] crate::session::SessionError),
}

impl RouterError {
    /// Whether the error comes from the caller's input rather than storage
    pub fn is_client_error(&self) -> bool {
        matches!(self, RouterError::UnknownPage(_))
    }
}

/// Result type for routing operations
pub type RouterResult<T> = Result<T, RouterError>;
