//! Error taxonomy for a relay job.
//!
//! Each variant maps to one stage of the workflow and carries enough context
//! to be logged without the caller knowing which stage produced it.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Malformed trigger input. Raised before any I/O.
    #[error("invalid configuration: {0}")]
    Validation(String),

    /// Transport, authentication or SFTP session negotiation failed.
    #[error("connection to {endpoint} failed: {reason}")]
    Connection { endpoint: String, reason: String },

    /// A single file could not be read locally or written remotely.
    #[error("transfer of {file} failed: {reason}")]
    Transfer { file: String, reason: String },

    /// The source directory could not be listed.
    #[error("cannot read source directory {}: {reason}", .path.display())]
    Filesystem { path: PathBuf, reason: String },

    /// An uploaded file could not be removed from local storage.
    #[error("failed to remove {}: {reason}", .path.display())]
    Cleanup { path: PathBuf, reason: String },
}

impl RelayError {
    /// True when the caller supplied bad input rather than the job failing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RelayError::Validation(_))
    }
}
