use std::fmt;

use serde::Serialize;

/// A CSS declaration (e.g., `color: red`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// The property name.
    pub name: String,
    /// The property value, trimmed, with `!important` removed.
    pub value: String,
    /// Whether the declaration has `!important`.
    pub important: bool,
}

/// A CSS selector (simplified representation)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selector {
    /// Raw selector text with whitespace runs collapsed to one space.
    pub text: String,
}

/// A CSS style rule (selector + declarations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleRule {
    /// The list of selectors for this rule.
    pub selectors: Vec<Selector>,
    /// The declarations in this rule block.
    pub declarations: Vec<Declaration>,
}

/// A CSS at-rule such as `@media` or `@import`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtRule {
    /// The at-keyword name (without the `@`).
    pub name: String,
    /// The prelude text between the name and the block or `;`.
    pub prelude: String,
    /// The raw block contents, if the rule had a block.
    pub block: Option<String>,
}

/// A CSS rule (either a style rule or an at-rule).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Rule {
    /// A style rule (qualified rule).
    Style(StyleRule),
    /// An at-rule.
    At(AtRule),
}

impl Rule {
    /// The style rule, if this is one.
    #[must_use]
    pub const fn as_style(&self) -> Option<&StyleRule> {
        match self {
            Self::Style(rule) => Some(rule),
            Self::At(_) => None,
        }
    }
}

/// A parsed stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stylesheet {
    /// The list of rules in the stylesheet.
    pub rules: Vec<Rule>,
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.value)?;
        if self.important {
            write!(f, " !important")?;
        }
        Ok(())
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selectors: Vec<&str> = self.selectors.iter().map(|s| s.text.as_str()).collect();
        write!(f, "{}{{", selectors.join(","))?;
        for (i, declaration) in self.declarations.iter().enumerate() {
            if i > 0 {
                write!(f, ";")?;
            }
            write!(f, "{declaration}")?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Style(rule) => write!(f, "{rule}"),
            Self::At(rule) => {
                write!(f, "@{}", rule.name)?;
                if !rule.prelude.is_empty() {
                    write!(f, " {}", rule.prelude)?;
                }
                match &rule.block {
                    Some(block) => write!(f, "{{{block}}}"),
                    None => write!(f, ";"),
                }
            }
        }
    }
}
