//! HTML tokenizer and tree builder for Kestrel.
//!
//! # Scope
//!
//! - **Tokenizer**: incremental, character-level; tags, quoted and unquoted
//!   attributes, self-closing tags, free text. `<!...>` and `<?...>` are
//!   skipped.
//! - **Tree builder**: strict stack of open elements. Mismatched end tags
//!   abort the parse with [`HtmlError::TagMismatch`]. The text of each
//!   `<style>` element is handed to a [`StylesheetParser`].
//!
//! # Not Implemented
//!
//! - Character references
//! - Comments and DOCTYPE tokens
//! - Implicit tag closing and insertion modes

use kestrel_common::warning::clear_warnings;

/// Error and issue types.
pub mod error;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;
/// Tree construction from tokens.
pub mod tree_builder;

pub use error::{HtmlError, ParseIssue};
pub use tokenizer::{Attribute, HTMLTokenizer, Token, TokenSink, TokenizerState};
pub use tree_builder::{CssStylesheetParser, ParsedDocument, StylesheetParser, TreeBuilder, format_tree};

/// A parse session: tokenizer and tree builder fed together.
///
/// Markup may be fed in any number of fragments; the result does not depend
/// on where the fragments are split.
#[derive(Debug)]
pub struct HTMLParser<P: StylesheetParser = CssStylesheetParser> {
    tokenizer: HTMLTokenizer,
    builder: TreeBuilder<P>,
}

impl HTMLParser {
    /// Create a session using the default CSS parser.
    #[must_use]
    pub fn new() -> Self {
        Self::with_stylesheet_parser(CssStylesheetParser)
    }
}

impl Default for HTMLParser {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: StylesheetParser> HTMLParser<P> {
    /// Create a session with a custom stylesheet parser.
    pub fn with_stylesheet_parser(stylesheet_parser: P) -> Self {
        Self {
            tokenizer: HTMLTokenizer::new(),
            builder: TreeBuilder::with_stylesheet_parser(stylesheet_parser),
        }
    }

    /// Feed a fragment of markup.
    ///
    /// # Errors
    ///
    /// Returns [`HtmlError::TagMismatch`] when an end tag does not close the
    /// innermost open element.
    pub fn feed(&mut self, input: &str) -> Result<(), HtmlError> {
        self.tokenizer.feed(input, &mut self.builder)
    }

    /// Signal end of input and return the finished document.
    ///
    /// # Errors
    ///
    /// Returns [`HtmlError::TagMismatch`] if the final fragment held a
    /// mismatched end tag.
    pub fn end(mut self) -> Result<ParsedDocument<P::Rule>, HtmlError> {
        self.tokenizer.end(&mut self.builder)?;
        let mut document = self.builder.finish();
        document.issues = self.tokenizer.take_issues();
        Ok(document)
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &kestrel_dom::DomTree {
        self.builder.tree()
    }
}

/// Parse a complete document with the default CSS parser.
///
/// Each call starts a new document, so warnings reported by an earlier
/// parse are reported again.
///
/// # Errors
///
/// Returns [`HtmlError::TagMismatch`] on the first end tag that does not
/// close the innermost open element.
pub fn parse_document(html: &str) -> Result<ParsedDocument, HtmlError> {
    clear_warnings();
    let mut parser = HTMLParser::new();
    parser.feed(html)?;
    parser.end()
}
