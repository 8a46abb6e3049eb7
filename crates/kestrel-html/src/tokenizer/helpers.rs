//! Helper functions for the HTML tokenizer.
//!
//! - State transitions ("switch to", "reconsume in")
//! - Token emission and flushing to the sink
//! - Attribute building
//! - Parse issue reporting

use kestrel_common::warning::warn_once;

use super::TokenSink;
use super::core::{HTMLTokenizer, TokenizerState};
use super::token::{Attribute, Token};
use crate::error::{HtmlError, ParseIssue};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// Transitions to a new state. The next character is consumed by the new
    /// state.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// Transitions to a new state without consuming the current character.
    /// The same character is processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    /// TAB, LF, FF and SPACE.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// Emit the current tag token, committing any attribute still being
    /// built.
    pub(super) fn emit_token(&mut self) {
        self.commit_attribute();
        if let Some(token) = self.current_token.take() {
            self.pending.push(token);
        }
    }

    /// Emit a text token for `c`.
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.pending.push(Token::new_text(c));
    }

    /// Emit the end-of-file token and stop accepting input.
    pub(super) fn emit_eof_token(&mut self) {
        self.at_eof = true;
        self.pending.push(Token::EndOfFile);
    }

    /// End of input inside a tag: the unfinished tag is dropped.
    pub(super) fn emit_eof_in_tag(&mut self) {
        self.log_parse_error("eof in tag");
        self.current_token = None;
        self.current_attribute = None;
        self.emit_eof_token();
    }

    /// Hand pending tokens to the sink in emission order.
    pub(super) fn flush<S: TokenSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), HtmlError> {
        for token in self.pending.drain(..) {
            sink.process_token(token)?;
        }
        Ok(())
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl HTMLTokenizer {
    /// Begin a new attribute with an empty name and value. An attribute
    /// still pending is committed first.
    pub(super) fn start_new_attribute(&mut self) {
        self.commit_attribute();
        self.current_attribute = Some(Attribute::new(String::new(), String::new()));
    }

    pub(super) fn append_to_current_attribute_name(&mut self, c: char) {
        if let Some(ref mut attr) = self.current_attribute {
            attr.name.push(c);
        }
    }

    pub(super) fn append_to_current_attribute_value(&mut self, c: char) {
        if let Some(ref mut attr) = self.current_attribute {
            attr.value.push(c);
        }
    }

    /// Move the pending attribute onto the current tag. Each attribute is
    /// committed at most once since the pending slot is emptied.
    pub(super) fn commit_attribute(&mut self) {
        let Some(attribute) = self.current_attribute.take() else {
            return;
        };
        let accepted = self
            .current_token
            .as_mut()
            .is_some_and(|token| token.push_attribute(attribute));
        if !accepted {
            self.log_parse_error("attribute on end tag dropped");
        }
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer {
    /// Record a tolerated parse error and report it once per message.
    pub(super) fn log_parse_error(&mut self, message: &str) {
        self.issues.push(ParseIssue {
            message: message.to_string(),
            position: self.position,
            state: self.state.to_string(),
        });
        warn_once("HTML Tokenizer", message);
    }
}
