//! Error types for Transmutation.
//!
//! Every fallible operation in the crate returns [`TransmutationError`]. The
//! variants form a closed taxonomy tagged by kind:
//!
//! - `InvalidInput`, `InvalidFormat`, `InvalidPath`, `InvalidOption` - raised by
//!   the validation guard before any cache or converter interaction
//! - `Converter` - a format converter failed; carries the format and the cause
//! - `FileNotFound` / `PermissionDenied` - file-system failures surfaced distinctly
//! - `NoConverterForFormat` - the registry has nothing registered for a tag
//! - `UnsupportedFormat` - a file extension no converter accepts
//! - `Config` - a configuration file could not be read or parsed
//! - `Io` - any other I/O error, passed through unchanged
//!
//! [`TransmutationError::kind`] maps each variant onto [`ErrorKind`], which is
//! what the metrics collector counts by.
//!
//! # Example
//!
//! ```rust
//! use transmutation::{ErrorKind, TransmutationError};
//!
//! let err = TransmutationError::invalid_input("buffer is empty");
//! assert_eq!(err.kind(), ErrorKind::InvalidInput);
//! assert_eq!(err.to_string(), "Invalid input: buffer is empty");
//! ```
use crate::types::FormatTag;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `TransmutationError`.
pub type Result<T> = std::result::Result<T, TransmutationError>;

/// Main error type for all Transmutation operations.
#[derive(Debug, Error)]
pub enum TransmutationError {
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid format: {message}")]
    InvalidFormat {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid file path: {message}")]
    InvalidPath {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid option {message}")]
    InvalidOption {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Failed to convert {format}: {message}")]
    Converter {
        format: FormatTag,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("File not found: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Permission denied: {}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No converter available for format: {0}")]
    NoConverterForFormat(FormatTag),

    #[error("Unsupported file format: {extension}. Supported formats: {supported}")]
    UnsupportedFormat { extension: String, supported: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Closed set of error kinds used as metrics keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidInput,
    InvalidFormat,
    InvalidPath,
    InvalidOption,
    Config,
    ConverterFailure,
    FileNotFound,
    PermissionDenied,
    NoConverterForFormat,
    UnsupportedFormat,
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::InvalidFormat => "InvalidFormat",
            ErrorKind::InvalidPath => "InvalidPath",
            ErrorKind::InvalidOption => "InvalidOption",
            ErrorKind::Config => "Config",
            ErrorKind::ConverterFailure => "ConverterFailure",
            ErrorKind::FileNotFound => "FileNotFound",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::NoConverterForFormat => "NoConverterForFormat",
            ErrorKind::UnsupportedFormat => "UnsupportedFormat",
            ErrorKind::Io => "Io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl TransmutationError {
    error_constructor!(invalid_input, InvalidInput);
    error_constructor!(invalid_format, InvalidFormat);
    error_constructor!(invalid_path, InvalidPath);
    error_constructor!(invalid_option, InvalidOption);
    error_constructor!(config, Config);

    /// Create a converter failure for `format`.
    pub fn converter<S: Into<String>>(format: FormatTag, message: S) -> Self {
        Self::Converter {
            format,
            message: message.into(),
            source: None,
        }
    }

    /// Create a converter failure for `format` wrapping the underlying cause.
    pub fn converter_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        format: FormatTag,
        message: S,
        source: E,
    ) -> Self {
        Self::Converter {
            format,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Translate an I/O error raised while reading `path`.
    ///
    /// `NotFound` and `PermissionDenied` get their own variants; every other
    /// kind passes through as `Io` unchanged.
    pub fn from_io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound {
                path: path.into(),
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.into(),
                source: err,
            },
            _ => Self::Io(err),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Self::InvalidPath { .. } => ErrorKind::InvalidPath,
            Self::InvalidOption { .. } => ErrorKind::InvalidOption,
            Self::Config { .. } => ErrorKind::Config,
            Self::Converter { .. } => ErrorKind::ConverterFailure,
            Self::FileNotFound { .. } => ErrorKind::FileNotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::NoConverterForFormat(_) => ErrorKind::NoConverterForFormat,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether the error was raised by input validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidInput | ErrorKind::InvalidFormat | ErrorKind::InvalidPath | ErrorKind::InvalidOption
        )
    }
}
