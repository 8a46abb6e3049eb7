//! HTML tokenizer module.
//!
//! An incremental character-level state machine covering the markup subset
//! Kestrel understands: start and end tags with quoted or unquoted
//! attributes, self-closing tags, free text, and bogus constructs
//! (`<!...>`, `<?...>`) that are skipped.

/// HTML tokenizer state machine implementation.
pub mod core;
/// Helper methods for tokenizer state transitions.
pub mod helpers;
/// Token types produced by the tokenizer.
pub mod token;

pub use core::{HTMLTokenizer, TokenizerState};
pub use token::{Attribute, Token};

use crate::error::HtmlError;

/// Receiver of tokens as the tokenizer produces them.
///
/// An error returned from [`TokenSink::process_token`] aborts the
/// tokenizer call that emitted the token.
pub trait TokenSink {
    /// Handle one token.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop tokenization.
    fn process_token(&mut self, token: Token) -> Result<(), HtmlError>;
}

impl TokenSink for Vec<Token> {
    fn process_token(&mut self, token: Token) -> Result<(), HtmlError> {
        self.push(token);
        Ok(())
    }
}
