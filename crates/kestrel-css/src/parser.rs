//! A small rule-level CSS parser.
//!
//! The parser works on characters rather than a token stream: it only needs
//! to find rule boundaries, so it tracks strings, comments and bracket depth
//! and leaves everything inside a value as text.

use kestrel_common::warning::warn_once;

use crate::rule::{AtRule, Declaration, Rule, Selector, StyleRule, Stylesheet};

/// Parse stylesheet text into its rules.
#[must_use]
pub fn parse_stylesheet(text: &str) -> Stylesheet {
    CssParser::new(text).parse_stylesheet()
}

/// CSS parser over a single stylesheet source.
#[derive(Debug)]
pub struct CssParser {
    input: Vec<char>,
    position: usize,
}

impl CssParser {
    /// Create a new parser for the given stylesheet text.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            input: text.chars().collect(),
            position: 0,
        }
    }

    /// Parse the whole input as a list of top-level rules.
    pub fn parse_stylesheet(&mut self) -> Stylesheet {
        let rules = self.consume_list_of_rules();
        Stylesheet { rules }
    }

    fn consume_list_of_rules(&mut self) -> Vec<Rule> {
        let mut rules = Vec::new();

        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                None => return rules,
                Some('@') => {
                    self.position += 1;
                    rules.push(Rule::At(self.consume_at_rule()));
                }
                Some('}') => {
                    warn_once("CSS Parser", "unbalanced '}' at top level");
                    self.position += 1;
                }
                Some(_) => {
                    if let Some(rule) = self.consume_qualified_rule() {
                        rules.push(Rule::Style(rule));
                    }
                }
            }
        }
    }

    /// Called with the `@` already consumed.
    fn consume_at_rule(&mut self) -> AtRule {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                name.push(c);
                self.position += 1;
            } else {
                break;
            }
        }

        let (prelude, stop) = self.consume_until(&['{', ';']);
        let block = match stop {
            Some('{') => {
                let (block, closed) = self.consume_until(&['}']);
                if closed.is_none() {
                    warn_once("CSS Parser", &format!("unterminated block in @{name}"));
                }
                Some(block.trim().to_string())
            }
            _ => None,
        };

        AtRule {
            name,
            prelude: collapse_whitespace(&prelude),
            block,
        }
    }

    fn consume_qualified_rule(&mut self) -> Option<StyleRule> {
        let (prelude, stop) = self.consume_until(&['{']);
        if stop.is_none() {
            warn_once("CSS Parser", "rule prelude without a block was dropped");
            return None;
        }

        let (block, closed) = self.consume_until(&['}']);
        if closed.is_none() {
            warn_once("CSS Parser", "unterminated declaration block");
        }

        let selectors = split_top_level(&prelude, ',')
            .into_iter()
            .map(|s| collapse_whitespace(&s))
            .filter(|s| !s.is_empty())
            .map(|text| Selector { text })
            .collect();

        Some(StyleRule {
            selectors,
            declarations: parse_declarations(&block),
        })
    }

    /// Consume characters until one of `stop` is found at bracket depth 0.
    ///
    /// The stop character is consumed but not included. Comments are
    /// dropped, strings are copied verbatim. Returns the text and the stop
    /// character, or `None` if the input ran out first.
    fn consume_until(&mut self, stop: &[char]) -> (String, Option<char>) {
        let mut out = String::new();
        let mut depth = 0usize;

        while let Some(c) = self.peek() {
            if c == '/' && self.peek_at(1) == Some('*') {
                self.skip_comment();
                continue;
            }
            self.position += 1;

            if depth == 0 && stop.contains(&c) {
                return (out, Some(c));
            }

            match c {
                '"' | '\'' => {
                    out.push(c);
                    self.copy_string(c, &mut out);
                }
                '(' | '[' | '{' => {
                    depth += 1;
                    out.push(c);
                }
                ')' | ']' | '}' => {
                    depth = depth.saturating_sub(1);
                    out.push(c);
                }
                _ => out.push(c),
            }
        }

        (out, None)
    }

    /// Called after the opening quote has been copied.
    fn copy_string(&mut self, quote: char, out: &mut String) {
        while let Some(c) = self.peek() {
            self.position += 1;
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = self.peek() {
                    self.position += 1;
                    out.push(escaped);
                }
            } else if c == quote {
                return;
            }
        }
    }

    fn skip_comment(&mut self) {
        self.position += 2;
        while let Some(c) = self.peek() {
            self.position += 1;
            if c == '*' && self.peek() == Some('/') {
                self.position += 1;
                return;
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.position += 1,
                Some('/') if self.peek_at(1) == Some('*') => self.skip_comment(),
                _ => return,
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// Split a declaration block into declarations.
///
/// Entries without a `:` are dropped with a warning.
fn parse_declarations(block: &str) -> Vec<Declaration> {
    let mut declarations = Vec::new();

    for entry in split_top_level(block, ';') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let Some((name, value)) = entry.split_once(':') else {
            warn_once("CSS Parser", &format!("declaration without ':' dropped: {entry}"));
            continue;
        };

        let mut value = value.trim();
        let mut important = false;
        if let Some(bang) = value.rfind('!')
            && value[bang + 1..].trim().eq_ignore_ascii_case("important")
        {
            important = true;
            value = value[..bang].trim_end();
        }

        declarations.push(Declaration {
            name: name.trim().to_string(),
            value: value.to_string(),
            important,
        });
    }

    declarations
}

/// Split on `separator` outside strings and brackets.
fn split_top_level(text: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in text.chars() {
        if let Some(q) = quote {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '(' | '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c == separator && depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
