use std::fmt;

use thiserror::Error;

/// Classification tag of a [`DomainError`]
///
/// This is the closed taxonomy the HTTP layer maps to status codes; it is
/// also what gets attached to log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    DirectoryTraversalAttempt,
    FileNotFound,
    PermissionDenied,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::DirectoryTraversalAttempt => "directory_traversal_attempt",
            Self::FileNotFound => "file_not_found",
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core domain errors
///
/// The `message` fields are server-side detail. They are logged, never
/// rendered to clients (see `api::types::error`).
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Directory traversal attempt: {message}")]
    DirectoryTraversal { message: String },

    #[error("File not found: {message}")]
    FileNotFound { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn directory_traversal(message: impl Into<String>) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
        }
    }

    pub fn file_not_found(message: impl Into<String>) -> Self {
        Self::FileNotFound {
            message: message.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::DirectoryTraversal { .. } => ErrorKind::DirectoryTraversalAttempt,
            Self::FileNotFound { .. } => ErrorKind::FileNotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Server-side detail message
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument { message }
            | Self::DirectoryTraversal { message }
            | Self::FileNotFound { message }
            | Self::PermissionDenied { message }
            | Self::NotFound { message }
            | Self::Internal { message } => message,
        }
    }
}
