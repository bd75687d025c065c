//! Parsing
//!
//! Turns haml source text into the raw node tree:
//! 1. **Classification**: each line becomes a [`Directive`](crate::haml::lexing::Directive)
//! 2. **Attribute scanning**: element heads are expanded into elements ([`attributes`])
//! 3. **Assembly**: the indentation stack nests nodes ([`tree_builder`])
//!
//! The raw tree still carries `If`/`ElseIf`/`Else` markers; see
//! [lowering](crate::haml::lowering) for the next stage.
//!
//! Parsing never fails. Anything that cannot be read as markup degrades to literal text.

pub mod attributes;
pub mod tree_builder;

use crate::haml::ast::Node;
pub use tree_builder::TreeBuilder;

/// Default tag used by `.class` / `#id` shorthand lines.
pub const DEFAULT_TAG: &str = "div";

/// Options that affect how a source is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Tag given to shorthand elements.
    pub default_tag: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            default_tag: DEFAULT_TAG.to_string(),
        }
    }
}

/// Parse a source into its raw tree with default options.
pub fn parse(source: &str) -> Vec<Node> {
    parse_with(source, &ParseOptions::default())
}

pub fn parse_with(source: &str, options: &ParseOptions) -> Vec<Node> {
    TreeBuilder::new(options).build(source)
}
