//! Error handling for token reads

use thiserror::Error;

/// Errors raised while pulling tokens out of a rig text file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Input ended while another token was required
    #[error("Unexpected end of input at line {line}")]
    UnexpectedEof {
        /// Line the tokenizer was on when input ran out
        line: usize,
    },

    /// A specific token was required but something else was found
    #[error("Line {line}: expected '{expected}', found '{found}'")]
    UnexpectedToken {
        /// The token that was required
        expected: String,
        /// The token actually read
        found: String,
        /// Line of the offending token
        line: usize,
    },

    /// A numeric read hit a token that is not a number of the requested kind
    #[error("Line {line}: invalid number '{token}'")]
    InvalidNumber {
        /// The token that failed to parse
        token: String,
        /// Line of the offending token
        line: usize,
    },
}

impl TokenError {
    /// Line number the error was raised on
    pub fn line(&self) -> usize {
        match self {
            Self::UnexpectedEof { line }
            | Self::UnexpectedToken { line, .. }
            | Self::InvalidNumber { line, .. } => *line,
        }
    }
}

/// Type alias for Results from token reads
pub type Result<T> = std::result::Result<T, TokenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = TokenError::UnexpectedToken {
            expected: "{".to_string(),
            found: "offset".to_string(),
            line: 3,
        };
        assert_eq!(
            format!("{}", error),
            "Line 3: expected '{', found 'offset'"
        );
        assert_eq!(error.line(), 3);

        let error = TokenError::UnexpectedEof { line: 12 };
        assert_eq!(format!("{}", error), "Unexpected end of input at line 12");
    }
}
