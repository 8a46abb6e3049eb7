//! Tree construction from the token stream.
//!
//! The builder keeps a stack of open elements whose bottom is always the
//! document node. Start tags push, end tags must match the top of the
//! stack exactly; there is no implicit closing or error recovery.

use std::fmt;

use kestrel_common::warning::warn_once;
use kestrel_css::{Rule, parse_stylesheet};
use kestrel_dom::{Attribute, DomTree, ElementData, NodeId, NodeType};

use crate::error::{HtmlError, ParseIssue};
use crate::tokenizer::{Token, TokenSink};

/// Turns stylesheet text into rules for the document's rule list.
///
/// The builder calls this once per closed `<style>` element and appends
/// whatever comes back, in order.
pub trait StylesheetParser {
    /// Rule type produced by this parser.
    type Rule: fmt::Debug;

    /// Parse one stylesheet.
    fn parse_rules(&mut self, text: &str) -> Vec<Self::Rule>;
}

/// The default [`StylesheetParser`], backed by `kestrel-css`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CssStylesheetParser;

impl StylesheetParser for CssStylesheetParser {
    type Rule = Rule;

    fn parse_rules(&mut self, text: &str) -> Vec<Rule> {
        parse_stylesheet(text).rules
    }
}

/// Output of a finished parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument<R = Rule> {
    /// The document tree.
    pub tree: DomTree,
    /// Rules from every `<style>` element, in document order.
    pub rules: Vec<R>,
    /// Problems the parser tolerated.
    pub issues: Vec<ParseIssue>,
}

/// Builds a [`DomTree`] from tokens.
#[derive(Debug)]
pub struct TreeBuilder<P: StylesheetParser = CssStylesheetParser> {
    tree: DomTree,
    stack_of_open_elements: Vec<NodeId>,
    /// Text node receiving characters; reset by any tag.
    current_text_node: Option<NodeId>,
    stylesheet_parser: P,
    rules: Vec<P::Rule>,
    finished: bool,
}

impl TreeBuilder {
    /// Create a builder using the default CSS parser.
    #[must_use]
    pub fn new() -> Self {
        Self::with_stylesheet_parser(CssStylesheetParser)
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: StylesheetParser> TreeBuilder<P> {
    /// Create a builder that hands `<style>` contents to `stylesheet_parser`.
    pub fn with_stylesheet_parser(stylesheet_parser: P) -> Self {
        Self {
            tree: DomTree::new(),
            stack_of_open_elements: vec![NodeId::ROOT],
            current_text_node: None,
            stylesheet_parser,
            rules: Vec::new(),
            finished: false,
        }
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Open nodes, document first.
    #[must_use]
    pub fn open_elements(&self) -> &[NodeId] {
        &self.stack_of_open_elements
    }

    /// Rules collected so far.
    #[must_use]
    pub fn rules(&self) -> &[P::Rule] {
        &self.rules
    }

    /// Whether the end-of-file token has been processed.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consume the builder and return the tree and rules.
    ///
    /// Elements still open are left where they are.
    #[must_use]
    pub fn finish(self) -> ParsedDocument<P::Rule> {
        if self.stack_of_open_elements.len() > 1 {
            warn_once("HTML Parser", "document ended with unclosed elements");
        }
        ParsedDocument {
            tree: self.tree,
            rules: self.rules,
            issues: Vec::new(),
        }
    }

    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    fn insert_element(&mut self, name: String, attributes: Vec<Attribute>, self_closing: bool) {
        let parent = self.current_node();
        let id = self
            .tree
            .alloc(NodeType::Element(ElementData::new(name, attributes)));
        self.tree.append_child(parent, id);
        if !self_closing {
            self.stack_of_open_elements.push(id);
        }
        self.current_text_node = None;
    }

    fn close_element(&mut self, name: &str) -> Result<(), HtmlError> {
        self.current_text_node = None;

        let current = self.current_node();
        let open_name = self
            .tree
            .as_element(current)
            .map(|data| data.tag_name.clone());
        if open_name.as_deref() != Some(name) {
            return Err(HtmlError::TagMismatch {
                expected: open_name,
                found: name.to_string(),
            });
        }

        if name == "style" {
            let text = self
                .tree
                .first_child(current)
                .and_then(|child| self.tree.as_text(child))
                .unwrap_or_default()
                .to_string();
            let rules = self.stylesheet_parser.parse_rules(&text);
            self.rules.extend(rules);
        }

        let _ = self.stack_of_open_elements.pop();
        Ok(())
    }

    fn insert_character(&mut self, c: char) {
        let text_node = match self.current_text_node {
            Some(id) => id,
            None => {
                let parent = self.current_node();
                let id = self.tree.alloc(NodeType::Text(String::new()));
                self.tree.append_child(parent, id);
                self.current_text_node = Some(id);
                id
            }
        };
        self.tree.append_text(text_node, c);
    }
}

impl<P: StylesheetParser> TokenSink for TreeBuilder<P> {
    fn process_token(&mut self, token: Token) -> Result<(), HtmlError> {
        if self.finished {
            warn_once("HTML Parser", "token after end of file ignored");
            return Ok(());
        }

        match token {
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => self.insert_element(name, attributes, self_closing),
            Token::EndTag { name } => self.close_element(&name)?,
            Token::Text { content } => self.insert_character(content),
            Token::EndOfFile => {
                self.current_text_node = None;
                self.finished = true;
            }
        }
        Ok(())
    }
}

/// Render the subtree rooted at `id` as an indented outline.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, 0, &mut out);
    out
}

fn write_node(tree: &DomTree, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    match &node.node_type {
        NodeType::Document => out.push_str(&format!("{indent}#document\n")),
        NodeType::Element(data) => {
            out.push_str(&format!("{indent}<{}", data.tag_name));
            for attr in &data.attrs {
                out.push_str(&format!(" {}=\"{}\"", attr.name, attr.value));
            }
            out.push_str(">\n");
        }
        NodeType::Text(text) => out.push_str(&format!("{indent}{text:?}\n")),
    }
    for &child in tree.children(id) {
        write_node(tree, child, depth + 1, out);
    }
}
