//! Stylesheet parsing for the Kestrel HTML tree builder.
//!
//! # Scope
//!
//! This crate turns the text of a `<style>` element into a list of rules:
//! - **Style rules** - comma-separated selectors and a declaration block
//! - **At-rules** - name, prelude and raw block, kept but not interpreted
//! - Comments are dropped; strings and nested brackets are respected
//!
//! # Not Yet Implemented
//!
//! - Selector parsing and matching
//! - Value parsing (lengths, colors, ...)
//! - Escape sequences in identifiers

/// Rule types produced by the parser.
pub mod rule;
/// The stylesheet parser.
pub mod parser;

pub use parser::{CssParser, parse_stylesheet};
pub use rule::{AtRule, Declaration, Rule, Selector, StyleRule, Stylesheet};
