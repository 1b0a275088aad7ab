//! Error types for image packaging operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `PackError`.
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors that can occur while packaging an image or writing its digest.
#[derive(Error, Debug)]
pub enum PackError {
    /// I/O operation failed (walk, read, write, or permission change).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output path does not name a supported archive kind.
    #[error("unsupported archive kind: {}", path.display())]
    UnsupportedFormat {
        /// The rejected output path.
        path: PathBuf,
    },

    /// Source directory does not exist.
    #[error("source not found: {}", path.display())]
    SourceNotFound {
        /// The missing source path.
        path: PathBuf,
    },

    /// Source path exists but is not a directory.
    #[error("source is not a directory: {}", path.display())]
    SourceNotDirectory {
        /// The offending source path.
        path: PathBuf,
    },

    /// A path cannot be represented as an archive entry name.
    #[error("path is not valid UTF-8: {}", path.display())]
    InvalidPath {
        /// The offending path.
        path: PathBuf,
    },

    /// Compression level outside the 1-9 range.
    #[error("invalid compression level {level}, must be 1-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// Configuration is incomplete or inconsistent.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Why the configuration was rejected.
        reason: String,
    },
}

impl PackError {
    /// Returns `true` if this error came from the filesystem.
    ///
    /// # Examples
    ///
    /// ```
    /// use imagepack_core::PackError;
    /// use std::path::PathBuf;
    ///
    /// let err = PackError::Io(std::io::Error::other("disk full"));
    /// assert!(err.is_io());
    ///
    /// let err = PackError::UnsupportedFormat {
    ///     path: PathBuf::from("image.rar"),
    /// };
    /// assert!(!err.is_io());
    /// ```
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Returns `true` if this error was raised before any filesystem
    /// mutation, because of the inputs rather than the environment.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat { .. }
                | Self::SourceNotFound { .. }
                | Self::SourceNotDirectory { .. }
                | Self::InvalidCompressionLevel { .. }
                | Self::InvalidConfiguration { .. }
        )
    }

    /// Stable machine-readable code for this error kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use imagepack_core::PackError;
    ///
    /// let err = PackError::InvalidCompressionLevel { level: 12 };
    /// assert_eq!(err.code(), "INVALID_COMPRESSION_LEVEL");
    /// ```
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO_ERROR",
            Self::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Self::SourceNotFound { .. } => "SOURCE_NOT_FOUND",
            Self::SourceNotDirectory { .. } => "SOURCE_NOT_DIRECTORY",
            Self::InvalidPath { .. } => "INVALID_PATH",
            Self::InvalidCompressionLevel { .. } => "INVALID_COMPRESSION_LEVEL",
            Self::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
        }
    }
}
