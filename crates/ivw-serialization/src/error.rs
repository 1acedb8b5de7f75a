//! Serialization error types.
//!
//! Missing nodes and attributes are never errors; they are how older and newer
//! documents stay loadable. Everything here is a structural or I/O failure.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building, reading or storing a document.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The byte stream is not a well-formed document.
    #[error("XML parse failure at byte {position}: {message}")]
    Parse { message: String, position: u64 },

    /// The document parsed but does not have the expected shape.
    #[error("invalid document: {reason}")]
    InvalidDocument { reason: String },

    /// An attribute exists but cannot be read as the requested type.
    #[error("value '{value}' for '{key}' is not a valid {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    /// The document was written by a newer format version.
    #[error("workspace version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion { found: u32, max_supported: u32 },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writer error while emitting XML into an in-memory or stream target.
    #[error("XML write error: {0}")]
    Write(#[from] std::io::Error),

    /// Error reported by the XML library.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl SerializationError {
    /// Create a Parse error.
    pub fn parse(message: impl Into<String>, position: u64) -> Self {
        Self::Parse {
            message: message.into(),
            position,
        }
    }

    /// Create an InvalidDocument error.
    pub fn invalid_document(reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            reason: reason.into(),
        }
    }

    /// Create an InvalidValue error.
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            expected,
        }
    }

    /// Whether the error means the load was aborted because the input is unreadable.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::InvalidDocument { .. } | Self::Xml(_)
        )
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the file at {}", operation, path.display()),
            Self::Parse { position, .. } => {
                format!("The workspace file is damaged near byte {position} and cannot be loaded.")
            }
            Self::InvalidDocument { reason } => {
                format!("The file is not an Inviwo workspace: {reason}")
            }
            Self::InvalidValue { key, value, .. } => {
                format!("The stored value '{value}' for '{key}' could not be read.")
            }
            Self::UnsupportedVersion {
                found,
                max_supported,
            } => format!(
                "This workspace was saved by a newer version (format {found}, supported up to \
                 {max_supported}). Please update the application."
            ),
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the file to {}. Please check disk space and permissions.",
                target_path.display()
            ),
            Self::Write(_) | Self::Xml(_) => {
                "An error occurred while writing the workspace data.".to_string()
            }
        }
    }
}

/// Result type alias for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;
