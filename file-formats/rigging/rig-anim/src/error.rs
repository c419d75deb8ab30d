//! Error handling for animation loading and binding

use rig_utils::TokenError;
use std::io;
use thiserror::Error;

/// Error types for animation parsing and skeleton binding
#[derive(Error, Debug)]
pub enum AnimError {
    /// I/O Error while reading an `.anim` file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed token stream
    #[error("Parse error: {0}")]
    Token(#[from] TokenError),

    /// The file does not start with the `animation` keyword
    #[error("Expected 'animation' header, found '{found}'")]
    MissingHeader {
        /// The first token of the file (empty if the file was empty)
        found: String,
    },

    /// Channel count does not cover the skeleton exactly
    #[error("Channel mismatch: skeleton needs {expected} channels, animation has {found}")]
    ChannelMismatch {
        /// `3 + 3 * joint_count`
        expected: usize,
        /// Channels present in the animation
        found: usize,
    },
}

/// Result type using AnimError
pub type Result<T> = std::result::Result<T, AnimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AnimError::ChannelMismatch {
            expected: 9,
            found: 6,
        };
        assert_eq!(
            format!("{}", error),
            "Channel mismatch: skeleton needs 9 channels, animation has 6"
        );

        let error = AnimError::MissingHeader {
            found: "skin".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Expected 'animation' header, found 'skin'"
        );
    }
}
