//! Error types for service file operations.
//!
//! Responsibilities:
//! - Define error variants for every failure of the resolver and the store.
//! - Classify I/O errors into permission failures and other I/O failures.
//!
//! Does NOT handle:
//! - Permission recovery (see `persistence::write`).
//!
//! Invariants:
//! - Every file-related variant carries the path it concerns.
//!   `LocationUnavailable`, `InvalidName` and `InvalidKey` are raised before
//!   any path is involved.
//! - `ServiceNotFound` carries the full list of names present at load time.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Convenience alias used by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors that can occur while resolving, reading or writing the service file.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Service file '{}' has not been found", path.display())]
    FileNotFound { path: PathBuf },

    #[error(
        "Service '{name}' has not been found in PG service file ({}). Available names: {}",
        path.display(),
        available.join(", ")
    )]
    ServiceNotFound {
        name: String,
        available: Vec<String>,
        path: PathBuf,
    },

    #[error("Permission denied while writing service file '{}': {source}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse service file '{}' at line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("I/O error on service file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid service name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Invalid setting key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("Unable to determine service file location: {0}")]
    LocationUnavailable(String),
}

impl ServiceError {
    /// Wraps an I/O error, routing permission failures to `PermissionDenied`.
    pub(crate) fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == ErrorKind::PermissionDenied {
            ServiceError::PermissionDenied {
                path: path.to_path_buf(),
                source,
            }
        } else {
            ServiceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// True for `FileNotFound` and `ServiceNotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ServiceError::FileNotFound { .. } | ServiceError::ServiceNotFound { .. }
        )
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ServiceError::PermissionDenied { .. })
    }

    /// True for names and keys the file format cannot store.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidName { .. } | ServiceError::InvalidKey { .. }
        )
    }
}
