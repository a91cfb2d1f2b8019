//! Error types for the taxonomy core.
//!
//! Only unrecoverable conditions live here. Validation problems found in a
//! well-formed document are reported as [`Finding`](crate::Finding)s instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for taxonomy operations.
pub type TaxaResult<T> = Result<T, TaxaError>;

/// Errors that abort a run.
#[derive(Error, Debug)]
pub enum TaxaError {
    #[error("Required file not found: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Bundled schema {name} could not be compiled: {message}")]
    Schema { name: &'static str, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
