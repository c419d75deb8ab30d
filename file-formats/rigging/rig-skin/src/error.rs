//! Error handling for skin loading and validation

use rig_utils::TokenError;
use std::io;
use thiserror::Error;

/// Error types for skin operations
#[derive(Error, Debug)]
pub enum SkinError {
    /// I/O Error while reading a `.skin` file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed token stream
    #[error("Parse error: {0}")]
    Token(#[from] TokenError),

    /// A top-level keyword that does not name a skin section
    #[error("Line {line}: unexpected section '{section}'")]
    UnexpectedSection {
        /// The offending keyword
        section: String,
        /// 1-based source line
        line: usize,
    },

    /// More weight entries than vertices
    #[error("skinweights declares {found} vertices but positions has {vertices}")]
    TooManyWeights {
        /// Entries in the `skinweights` block
        found: usize,
        /// Entries in the `positions` block
        vertices: usize,
    },

    /// Index data that refers outside the mesh or the bindings
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for skin operations
pub type Result<T> = std::result::Result<T, SkinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = SkinError::UnexpectedSection {
            section: "colors".to_string(),
            line: 12,
        };
        assert_eq!(format!("{}", error), "Line 12: unexpected section 'colors'");

        let error = SkinError::TooManyWeights {
            found: 5,
            vertices: 3,
        };
        assert_eq!(
            format!("{}", error),
            "skinweights declares 5 vertices but positions has 3"
        );
    }
}
