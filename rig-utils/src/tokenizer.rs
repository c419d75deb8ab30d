//! Whitespace and brace delimited tokenizer
//!
//! All three rig formats (`.skel`, `.skin`, `.anim`) are streams of tokens
//! separated by whitespace. Braces always form their own token, so
//! `balljoint root{` and `balljoint root {` read the same. A `#` starts a
//! comment that runs to the end of the line.

use crate::error::{Result, TokenError};

/// Pull-based tokenizer over borrowed text
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer positioned at the start of `src`
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
        }
    }

    /// Current 1-based line number
    pub fn line(&self) -> usize {
        self.line
    }

    /// Whether only whitespace and comments remain
    pub fn is_exhausted(&self) -> bool {
        self.peek_token().is_none()
    }

    fn skip_whitespace_and_comments(&mut self) {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b'#' => {
                    while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                c if c.is_ascii_whitespace() => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Read the next token, or `None` at end of input
    pub fn next_token(&mut self) -> Option<&'a str> {
        self.skip_whitespace_and_comments();

        let bytes = self.src.as_bytes();
        if self.pos >= bytes.len() {
            return None;
        }

        let start = self.pos;
        if matches!(bytes[start], b'{' | b'}') {
            self.pos += 1;
            return Some(&self.src[start..self.pos]);
        }

        while self.pos < bytes.len() {
            let c = bytes[self.pos];
            if c.is_ascii_whitespace() || matches!(c, b'{' | b'}' | b'#') {
                break;
            }
            self.pos += 1;
        }

        Some(&self.src[start..self.pos])
    }

    /// Look at the next token without consuming it
    pub fn peek_token(&self) -> Option<&'a str> {
        let mut probe = *self;
        probe.next_token()
    }

    /// Read the next token, failing at end of input
    pub fn token(&mut self) -> Result<&'a str> {
        self.next_token()
            .ok_or(TokenError::UnexpectedEof { line: self.line })
    }

    /// Consume the next token and require it to equal `expected`
    pub fn expect(&mut self, expected: &str) -> Result<()> {
        let found = self.token()?;
        if found == expected {
            Ok(())
        } else {
            Err(TokenError::UnexpectedToken {
                expected: expected.to_string(),
                found: found.to_string(),
                line: self.line,
            })
        }
    }

    /// Discard tokens up to and including the next occurrence of `target`
    pub fn skip_to(&mut self, target: &str) -> Result<()> {
        loop {
            if self.token()? == target {
                return Ok(());
            }
        }
    }

    fn parse_next<T: std::str::FromStr>(&mut self) -> Result<T> {
        let token = self.token()?;
        token.parse().map_err(|_| TokenError::InvalidNumber {
            token: token.to_string(),
            line: self.line,
        })
    }

    /// Read a floating point value
    pub fn read_f32(&mut self) -> Result<f32> {
        self.parse_next()
    }

    /// Read a signed integer
    pub fn read_i32(&mut self) -> Result<i32> {
        self.parse_next()
    }

    /// Read a non-negative count or index
    pub fn read_usize(&mut self) -> Result<usize> {
        self.parse_next()
    }

    /// Read `N` consecutive floats
    pub fn read_f32s<const N: usize>(&mut self) -> Result<[f32; N]> {
        let mut values = [0.0; N];
        for value in &mut values {
            *value = self.read_f32()?;
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn collect(src: &str) -> Vec<&str> {
        let mut tokenizer = Tokenizer::new(src);
        std::iter::from_fn(|| tokenizer.next_token()).collect()
    }

    #[test]
    fn test_splits_on_whitespace() {
        assert_eq!(
            collect("offset 1.0\t2.0\n  3.0"),
            vec!["offset", "1.0", "2.0", "3.0"]
        );
    }

    #[test_case("balljoint root{", &["balljoint", "root", "{"] ; "open brace glued")]
    #[test_case("pose 0 0 0}", &["pose", "0", "0", "0", "}"] ; "close brace glued")]
    #[test_case("{}", &["{", "}"] ; "adjacent braces")]
    #[test_case("a # comment { }\nb", &["a", "b"] ; "comment to end of line")]
    #[test_case("value#trailing", &["value"] ; "comment glued to token")]
    fn test_brace_and_comment_handling(src: &str, expected: &[&str]) {
        assert_eq!(collect(src), expected);
    }

    #[test]
    fn test_line_tracking() {
        let mut tokenizer = Tokenizer::new("a\n\nb\nc");
        tokenizer.next_token();
        assert_eq!(tokenizer.line(), 1);
        tokenizer.next_token();
        assert_eq!(tokenizer.line(), 3);
        tokenizer.next_token();
        assert_eq!(tokenizer.line(), 4);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut tokenizer = Tokenizer::new("first second");
        assert_eq!(tokenizer.peek_token(), Some("first"));
        assert_eq!(tokenizer.next_token(), Some("first"));
        assert_eq!(tokenizer.peek_token(), Some("second"));
        assert!(!tokenizer.is_exhausted());
        tokenizer.next_token();
        assert!(tokenizer.is_exhausted());
    }

    #[test]
    fn test_numeric_reads() {
        let mut tokenizer = Tokenizer::new("-1.5 42 7 0.25 0.5 0.75");
        assert_eq!(tokenizer.read_f32().unwrap(), -1.5);
        assert_eq!(tokenizer.read_i32().unwrap(), 42);
        assert_eq!(tokenizer.read_usize().unwrap(), 7);
        assert_eq!(tokenizer.read_f32s::<3>().unwrap(), [0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_invalid_number() {
        let mut tokenizer = Tokenizer::new("\n\nsmooth");
        let err = tokenizer.read_f32().unwrap_err();
        assert_eq!(
            err,
            TokenError::InvalidNumber {
                token: "smooth".to_string(),
                line: 3
            }
        );
    }

    #[test]
    fn test_expect_and_eof() {
        let mut tokenizer = Tokenizer::new("{ x");
        tokenizer.expect("{").unwrap();
        assert!(matches!(
            tokenizer.expect("}"),
            Err(TokenError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            tokenizer.token(),
            Err(TokenError::UnexpectedEof { line: 1 })
        ));
    }

    #[test]
    fn test_skip_to() {
        let mut tokenizer = Tokenizer::new("1 2 3 } after");
        tokenizer.skip_to("}").unwrap();
        assert_eq!(tokenizer.next_token(), Some("after"));

        let mut tokenizer = Tokenizer::new("no closing brace");
        assert!(tokenizer.skip_to("}").is_err());
    }
}
