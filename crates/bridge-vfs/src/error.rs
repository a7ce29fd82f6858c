//! VFS error types.

use bridge_core::BridgeError;
use thiserror::Error;

/// File error codes reported to callers, as in the Cordova File API.
pub mod codes {
    pub const NOT_FOUND_ERR: u32 = 1;
    pub const NOT_READABLE_ERR: u32 = 4;
}

/// VFS error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VfsError {
    /// The host reports that the file does not exist.
    #[error("NOT_FOUND_ERR: {path}")]
    NotFound { path: String },

    /// The host refused to read the file.
    #[error("read failed ({code}): {message}")]
    Read { code: u32, message: String },

    /// The host refused the write.
    #[error("write failed: {0}")]
    Write(String),

    /// Deleting a file or directory failed.
    #[error("remove failed: {0}")]
    Remove(String),

    /// The command never got an answer from the host.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl VfsError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Numeric file error code.
    ///
    /// Everything except a host-supplied read code maps to `NOT_FOUND_ERR`.
    #[must_use]
    pub fn code(&self) -> u32 {
        match self {
            Self::Read { code, .. } => *code,
            _ => codes::NOT_FOUND_ERR,
        }
    }

    /// Message without the code prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NotFound { .. } => "NOT_FOUND_ERR".to_string(),
            Self::Read { message, .. } => message.clone(),
            Self::Write(m) | Self::Remove(m) => m.clone(),
            Self::Bridge(e) => e.to_string(),
        }
    }

    /// True if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for VFS operations.
pub type VfsResult<T> = Result<T, VfsError>;
