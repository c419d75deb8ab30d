//! Error handling for skeleton loading

use rig_utils::TokenError;
use std::io;
use thiserror::Error;

/// Error types for skeleton loading and editing
#[derive(Error, Debug)]
pub enum SkelError {
    /// I/O Error while reading a `.skel` file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed token stream
    #[error("Parse error: {0}")]
    Token(#[from] TokenError),

    /// The file contains no `balljoint` block
    #[error("No root balljoint found")]
    MissingRoot,

    /// A joint id that does not belong to this skeleton
    #[error("Invalid joint id: {0}")]
    InvalidJoint(usize),
}

/// Result type using SkelError
pub type Result<T> = std::result::Result<T, SkelError>;
