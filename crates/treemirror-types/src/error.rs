//! Error types and handling for treemirror
//!
//! Every failure that aborts a sync is represented by [`Error`]. Transient
//! failures during empty-directory cleanup never become an `Error`; the engine
//! logs and drops them.

use std::path::{Path, PathBuf};

/// Error severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Low severity - operation can continue
    Low,
    /// Medium severity - operation may succeed if retried
    Medium,
    /// High severity - operation should be aborted
    High,
    /// Critical severity - entire process should be terminated
    Critical,
}

/// Main error type for treemirror operations
#[derive(thiserror::Error, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    /// The source root did not exist when the sync started
    #[error("Source directory does not exist: {}", path.display())]
    SourceMissing {
        /// Path of the missing source root
        path: PathBuf,
    },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        /// Error message from the I/O operation
        message: String,
    },

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found
        path: PathBuf,
    },

    /// Permission denied
    #[error("Permission denied: {}", path.display())]
    PermissionDenied {
        /// Path to the file with permission issues
        path: PathBuf,
    },

    /// A destination entry has a different kind than the source entry at the same path
    #[error("File/directory mismatch at destination path: {}", path.display())]
    TypeMismatch {
        /// Destination path whose kind conflicts with the source tree
        path: PathBuf,
    },

    /// Exclusion pattern could not be compiled
    #[error("Invalid exclusion pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Why compilation failed
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Source root missing
    SourceMissing,
    /// I/O related errors
    Io,
    /// Source/destination kind conflict
    TypeMismatch,
    /// Pattern compilation errors
    Pattern,
    /// Configuration errors
    Config,
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceMissing { .. } => ErrorKind::SourceMissing,
            Self::Io { .. } | Self::FileNotFound { .. } | Self::PermissionDenied { .. } => {
                ErrorKind::Io
            }
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::InvalidPattern { .. } => ErrorKind::Pattern,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    /// Get the error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Io { .. } => ErrorSeverity::Medium,
            Self::SourceMissing { .. }
            | Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::TypeMismatch { .. }
            | Self::InvalidPattern { .. }
            | Self::Config { .. } => ErrorSeverity::High,
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io { message } => {
                message.contains("Interrupted")
                    || message.contains("WouldBlock")
                    || message.contains("TimedOut")
            }
            _ => false,
        }
    }

    /// Wrap an I/O error with the operation and path it failed on
    pub fn io(operation: &str, path: &Path, error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Self::Io {
                message: format!("Failed to {} '{}': {}", operation, path.display(), error),
            },
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
