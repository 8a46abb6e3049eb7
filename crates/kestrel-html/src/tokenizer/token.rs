use core::fmt;

pub use kestrel_dom::Attribute;

/// Tokens handed from the tokenizer to a [`TokenSink`](super::TokenSink).
///
/// Start and end tags carry a tag name; only start tags carry attributes and
/// the self-closing flag. Text is emitted one character at a time and the
/// tree builder coalesces adjacent characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name attr="v">` or `<name/>`.
    StartTag {
        /// Tag name, case preserved.
        name: String,
        /// Set when the tag ended with `/>`.
        self_closing: bool,
        /// Attributes in source order, duplicates included.
        attributes: Vec<Attribute>,
    },

    /// `</name>`.
    EndTag {
        /// Tag name, case preserved.
        name: String,
    },

    /// A single character of text content.
    Text {
        /// The character.
        content: char,
    },

    /// End of input. Always the last token of a session.
    EndOfFile,
}

impl Token {
    /// A start tag with an empty name, no attributes and the flag unset.
    #[must_use]
    pub const fn new_start_tag() -> Self {
        Self::StartTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// An end tag with an empty name.
    #[must_use]
    pub const fn new_end_tag() -> Self {
        Self::EndTag {
            name: String::new(),
        }
    }

    /// A text token for one character.
    #[must_use]
    pub const fn new_text(content: char) -> Self {
        Self::Text { content }
    }

    /// Append a character to the tag name. No effect on non-tag tokens.
    pub fn append_to_tag_name(&mut self, c: char) {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name } => name.push(c),
            Self::Text { .. } | Self::EndOfFile => {}
        }
    }

    /// Mark a start tag as self-closing.
    ///
    /// Returns `false` if the token is not a start tag, in which case the
    /// flag has nowhere to go.
    pub const fn set_self_closing(&mut self) -> bool {
        if let Self::StartTag { self_closing, .. } = self {
            *self_closing = true;
            true
        } else {
            false
        }
    }

    /// Push a finished attribute onto a start tag.
    ///
    /// Returns `false` (and drops the attribute) for any other token.
    pub fn push_attribute(&mut self, attribute: Attribute) -> bool {
        if let Self::StartTag { attributes, .. } = self {
            attributes.push(attribute);
            true
        } else {
            false
        }
    }

    /// The tag name, for start and end tags.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name } => Some(name),
            Self::Text { .. } | Self::EndOfFile => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "StartTag <{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name } => write!(f, "EndTag </{name}>"),
            Self::Text { content } => write!(f, "Text {content:?}"),
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_tag_rejects_start_tag_fields() {
        let mut token = Token::new_end_tag();
        token.append_to_tag_name('p');
        assert!(!token.set_self_closing());
        assert!(!token.push_attribute(Attribute::new("a".to_string(), String::new())));
        assert_eq!(token, Token::EndTag { name: "p".to_string() });
    }

    #[test]
    fn test_display() {
        let token = Token::StartTag {
            name: "img".to_string(),
            self_closing: true,
            attributes: vec![Attribute::new("src".to_string(), "a.png".to_string())],
        };
        assert_eq!(token.to_string(), "StartTag <img src=\"a.png\" />");
        assert_eq!(Token::new_text('x').to_string(), "Text 'x'");
    }
}
