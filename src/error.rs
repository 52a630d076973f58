//! Error types for permuta operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during permuta operations.
///
/// Only setup-level failures surface here; per-file read errors and
/// per-rename failures are reported as diagnostics and degrade the
/// affected file's candidacy instead of aborting the run.
#[derive(Error, Debug)]
pub enum PermutaError {
    /// I/O error during read/write operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A tree root could not be opened or statted.
    #[error("cannot access '{path}': {source}")]
    RootAccess {
        /// Path of the offending root.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Invalid block size specified.
    #[error("Invalid block size: {0} (must be power of 2, 512-65536)")]
    InvalidBlockSize(usize),

    /// A saved rename plan could not be parsed or encoded.
    #[error("Invalid rename plan: {0}")]
    Plan(String),
}

/// Result type for permuta operations.
pub type Result<T> = std::result::Result<T, PermutaError>;
