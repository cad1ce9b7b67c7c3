//! Error types for hostprep operations.
//!
//! This module defines [`HostprepError`], the error type shared by both
//! binaries, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - External command failures are never errors; they come back as a
//!   [`CommandResult`](crate::shell::CommandResult) and each call site
//!   decides whether they are fatal
//! - Use `HostprepError` for failures that end the process
//! - Use `anyhow::Error` (via `HostprepError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for hostprep operations.
#[derive(Debug, Error)]
pub enum HostprepError {
    /// An explicitly requested config file does not exist.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a config file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A template referenced a variable that has no value.
    #[error("Unresolved template variable: {name}")]
    UnresolvedVariable { name: String },

    /// Initial clone of the VM repository failed.
    #[error("Failed to clone {url} into {path}: {message}")]
    CloneFailed {
        url: String,
        path: PathBuf,
        message: String,
    },

    /// The boot script could not be written or made executable.
    #[error("Failed to write boot script {path}: {source}")]
    ScriptWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for hostprep operations.
pub type Result<T> = std::result::Result<T, HostprepError>;
