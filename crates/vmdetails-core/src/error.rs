//! Error types for the VM details core library.

use std::path::PathBuf;

/// The main error type for VM details operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error with optional path context.
    #[error("I/O error{}: {source}", path.as_ref().map(|p| format!(" at '{}'", p.display())).unwrap_or_default())]
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },

    /// Malformed inventory dump.
    #[error("Inventory error: {message}")]
    Inventory { message: String },

    /// Malformed deployment descriptor.
    #[error("Deployment error: {message}")]
    Deployment { message: String },

    /// Failure in the primary IP resolver.
    #[error("IP resolution error: {message}")]
    IpResolution { message: String },
}

/// A specialized Result type for VM details operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an I/O error with path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: Some(path.into()),
        }
    }

    /// Create an I/O error without path context.
    pub fn io_simple(source: std::io::Error) -> Self {
        Self::Io { source, path: None }
    }

    /// Create an inventory error.
    pub fn inventory(message: impl Into<String>) -> Self {
        Self::Inventory {
            message: message.into(),
        }
    }

    /// Create a deployment descriptor error.
    pub fn deployment(message: impl Into<String>) -> Self {
        Self::Deployment {
            message: message.into(),
        }
    }

    /// Create an IP resolution error.
    pub fn ip_resolution(message: impl Into<String>) -> Self {
        Self::IpResolution {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::io_simple(source)
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::inventory(source.to_string())
    }
}
