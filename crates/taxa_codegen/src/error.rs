//! Error types for code generation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generation operations.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Errors that can occur while rendering or writing a module.
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Unsupported output file {0}. Expected one of: .js, .ts, .tsx")]
    UnsupportedOutput(PathBuf),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "Event keys \"{first}\" and \"{second}\" both generate the identifier \"{identifier}\""
    )]
    IdentifierCollision {
        first: String,
        second: String,
        identifier: String,
    },
}
