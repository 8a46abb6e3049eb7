use kestrel_common::warning::warn_once;
use strum_macros::Display;

use super::TokenSink;
use super::token::Token;
use crate::error::{HtmlError, ParseIssue};

/// The tokenizer state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// Free text between tags.
    Data,
    /// After `<`.
    TagOpen,
    /// After `</`.
    EndTagOpen,
    /// Inside a tag name.
    TagName,
    /// Whitespace before an attribute name.
    BeforeAttributeName,
    /// Inside an attribute name.
    AttributeName,
    /// After an attribute name, before `=` or the next attribute.
    AfterAttributeName,
    /// After `=`, before the value.
    BeforeAttributeValue,
    /// Inside `"..."`.
    AttributeValueDoubleQuoted,
    /// Inside `'...'`.
    AttributeValueSingleQuoted,
    /// Inside an unquoted value.
    AttributeValueUnquoted,
    /// Just after the closing quote of a value.
    AfterAttributeValueQuoted,
    /// After `/` inside a tag.
    SelfClosingStartTag,
    /// Inside `<!...>` or `<?...>`, skipped up to `>`.
    BogusComment,
}

/// Incremental HTML tokenizer.
///
/// Input may arrive in arbitrary fragments through [`HTMLTokenizer::feed`];
/// a tag split across two calls produces the same tokens as the whole
/// string. Tokens are handed to a [`TokenSink`] as soon as they are
/// complete.
#[derive(Debug)]
pub struct HTMLTokenizer {
    pub(super) state: TokenizerState,
    pub(super) current_input_character: Option<char>,
    pub(super) current_token: Option<Token>,
    pub(super) current_attribute: Option<super::Attribute>,
    /// Characters consumed so far.
    pub(super) position: usize,
    pub(super) at_eof: bool,
    // "Reconsume in the X state" sets this flag.
    pub(super) reconsume: bool,
    /// Tokens emitted while handling the current character, flushed to the
    /// sink before the next one.
    pub(super) pending: Vec<Token>,
    pub(super) issues: Vec<ParseIssue>,
}

impl Default for HTMLTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl HTMLTokenizer {
    /// Create a tokenizer in the data state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: TokenizerState::Data,
            current_input_character: None,
            current_token: None,
            current_attribute: None,
            position: 0,
            at_eof: false,
            reconsume: false,
            pending: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Whether the end-of-file token has been emitted.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.at_eof
    }

    /// Number of characters consumed so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Issues recorded so far in this session.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Take the recorded issues, leaving the list empty.
    pub fn take_issues(&mut self) -> Vec<ParseIssue> {
        std::mem::take(&mut self.issues)
    }

    /// Feed a fragment of markup.
    ///
    /// Input fed after [`HTMLTokenizer::end`] is ignored.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `sink`; the remaining characters
    /// of the fragment are not consumed.
    pub fn feed<S: TokenSink + ?Sized>(&mut self, input: &str, sink: &mut S) -> Result<(), HtmlError> {
        if self.at_eof {
            if !input.is_empty() {
                warn_once("HTML Tokenizer", "input after end of file ignored");
            }
            return Ok(());
        }

        for c in input.chars() {
            self.step(Some(c));
            self.position += 1;
            self.flush(sink)?;
        }
        Ok(())
    }

    /// Signal end of input. Emits [`Token::EndOfFile`] exactly once; a tag
    /// still being built is dropped.
    ///
    /// # Errors
    ///
    /// Returns the error reported by `sink`, if any.
    pub fn end<S: TokenSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), HtmlError> {
        if self.at_eof {
            return Ok(());
        }
        self.step(None);
        if !self.at_eof {
            self.emit_eof_token();
        }
        self.flush(sink)
    }

    /// Tokenize a complete document: [`HTMLTokenizer::feed`] followed by
    /// [`HTMLTokenizer::end`].
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `sink`.
    pub fn tokenize<S: TokenSink + ?Sized>(&mut self, input: &str, sink: &mut S) -> Result<(), HtmlError> {
        self.feed(input, sink)?;
        self.end(sink)
    }

    /// Run the state machine on one input unit, `None` being end of file.
    fn step(&mut self, input: Option<char>) {
        self.current_input_character = input;
        loop {
            self.reconsume = false;
            match self.state {
                TokenizerState::Data => self.handle_data_state(),
                TokenizerState::TagOpen => self.handle_tag_open_state(),
                TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
                TokenizerState::TagName => self.handle_tag_name_state(),
                TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
                TokenizerState::AttributeName => self.handle_attribute_name_state(),
                TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
                TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
                TokenizerState::AttributeValueDoubleQuoted => {
                    self.handle_attribute_value_quoted_state('"');
                }
                TokenizerState::AttributeValueSingleQuoted => {
                    self.handle_attribute_value_quoted_state('\'');
                }
                TokenizerState::AttributeValueUnquoted => {
                    self.handle_attribute_value_unquoted_state();
                }
                TokenizerState::AfterAttributeValueQuoted => {
                    self.handle_after_attribute_value_quoted_state();
                }
                TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
                TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            }
            if !self.reconsume {
                break;
            }
        }
    }

    fn handle_data_state(&mut self) {
        match self.current_input_character {
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_start_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            Some('!' | '?') => {
                self.log_parse_error("markup declaration skipped");
                self.switch_to(TokenizerState::BogusComment);
            }
            None => {
                self.log_parse_error("eof before tag name");
                self.emit_character_token('<');
                self.emit_eof_token();
            }
            Some(_) => {
                self.log_parse_error("unescaped '<' in text");
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            Some('>') => {
                self.log_parse_error("missing end tag name");
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.log_parse_error("eof before tag name");
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.emit_eof_token();
            }
            Some(_) => {
                self.log_parse_error("invalid first character of tag name");
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.emit_eof_in_tag(),
            Some(c) => {
                if let Some(ref mut token) = self.current_token {
                    token.append_to_tag_name(c);
                }
            }
        }
    }

    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some('=') => {
                self.log_parse_error("'=' before attribute name");
                self.start_new_attribute();
                self.append_to_current_attribute_name('=');
                self.switch_to(TokenizerState::AttributeName);
            }
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some(c) => {
                if matches!(c, '"' | '\'' | '<') {
                    self.log_parse_error("unexpected character in attribute name");
                }
                self.append_to_current_attribute_name(c);
            }
        }
    }

    fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/') => {
                self.commit_attribute();
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.emit_eof_in_tag(),
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            Some('>') => {
                self.log_parse_error("missing attribute value");
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.emit_eof_in_tag(),
            Some(_) => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// Shared by the double- and single-quoted value states; each loops on
    /// itself until its own quote character.
    fn handle_attribute_value_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => {
                self.commit_attribute();
                self.switch_to(TokenizerState::AfterAttributeValueQuoted);
            }
            None => self.emit_eof_in_tag(),
            Some(c) => self.append_to_current_attribute_value(c),
        }
    }

    fn handle_attribute_value_unquoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.commit_attribute();
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => {
                self.commit_attribute();
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.emit_eof_in_tag(),
            Some(c) => {
                if matches!(c, '"' | '\'' | '<' | '=' | '`') {
                    self.log_parse_error("unexpected character in unquoted attribute value");
                }
                self.append_to_current_attribute_value(c);
            }
        }
    }

    fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.emit_eof_in_tag(),
            Some(_) => {
                self.log_parse_error("missing whitespace between attributes");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                let is_start_tag = self
                    .current_token
                    .as_mut()
                    .is_some_and(Token::set_self_closing);
                if !is_start_tag {
                    self.log_parse_error("self-closing flag on end tag ignored");
                }
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.emit_eof_in_tag(),
            Some(_) => {
                self.log_parse_error("unexpected solidus in tag");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            Some('>') => self.switch_to(TokenizerState::Data),
            None => self.emit_eof_token(),
            Some(_) => {}
        }
    }
}
