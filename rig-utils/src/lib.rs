//! Shared utilities for the rig-rs format crates.
//!
//! The skeleton, skin and animation formats are all plain text streams read
//! through the same [`Tokenizer`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod tokenizer;

pub use error::{Result, TokenError};
pub use tokenizer::Tokenizer;
