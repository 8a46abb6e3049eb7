use serde::Serialize;
use thiserror::Error;

/// Errors that abort an HTML parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HtmlError {
    /// An end tag did not match the innermost open element.
    ///
    /// `expected` is the open element's tag name, or `None` when only the
    /// document node was open.
    #[error("unexpected end tag </{found}>, open element is {}", open_element(.expected))]
    TagMismatch {
        /// Tag name of the innermost open element.
        expected: Option<String>,
        /// Tag name carried by the end tag.
        found: String,
    },
}

fn open_element(expected: &Option<String>) -> String {
    expected
        .as_ref()
        .map_or_else(|| "#document".to_string(), |name| format!("<{name}>"))
}

/// A tolerated oddity in the markup.
///
/// Issues never stop the parse; they are collected per session and
/// reported once through the warning channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseIssue {
    /// What was tolerated.
    pub message: String,
    /// Character offset of the input unit that triggered it.
    pub position: usize,
    /// Tokenizer state at the time.
    pub state: String,
}
