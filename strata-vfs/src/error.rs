//! VFS Error Types

use thiserror::Error;

/// Result type for VFS operations
pub type VfsResult<T> = Result<T, VfsError>;

/// Error type for VFS operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VfsError {
    /// File or directory not found
    #[error("Path not found: {path}")]
    NotFound { path: String },

    /// Permission denied
    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    /// File content is not valid UTF-8 source text
    #[error("Invalid UTF-8 in '{path}': {reason}")]
    InvalidUtf8 { path: String, reason: String },

    /// Path exists but is not a directory
    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    /// IO error
    #[error("IO error: {message}")]
    Io { message: String },
}

impl VfsError {
    /// Whether this error only means "nothing there"
    pub fn is_not_found(&self) -> bool {
        matches!(self, VfsError::NotFound { .. })
    }
}

impl From<std::io::Error> for VfsError {
    fn from(err: std::io::Error) -> Self {
        VfsError::Io {
            message: err.to_string(),
        }
    }
}
