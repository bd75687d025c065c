//! Individual transformation stages
//!
//! Each stage implements [`Runnable`] and can be chained into a [`Transform`](super::Transform).

use crate::haml::ast::Node;
use crate::haml::codegen::generate;
use crate::haml::expr::parse;
use crate::haml::lowering::lower;
use crate::haml::parsing::{parse_with, ParseOptions};
use crate::haml::transforms::{Runnable, TransformError};

/// Assembling stage: source text → raw tree (with `If`/`ElseIf`/`Else` markers).
#[derive(Debug, Clone, Default)]
pub struct Assembling {
    options: ParseOptions,
}

impl Assembling {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }
}

impl Runnable<String, Vec<Node>> for Assembling {
    fn run(&self, input: String) -> Result<Vec<Node>, TransformError> {
        Ok(parse_with(&input, &self.options))
    }
}

/// Lowering stage: raw tree → tree of decision chains.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lowering;

impl Lowering {
    pub fn new() -> Self {
        Self
    }
}

impl Runnable<Vec<Node>, Vec<Node>> for Lowering {
    fn run(&self, input: Vec<Node>) -> Result<Vec<Node>, TransformError> {
        let lowered = lower(&input);
        tracing::debug!(nodes = lowered.len(), "lowered control flow");
        Ok(lowered)
    }
}

/// Generation stage: lowered tree → program source.
///
/// Fails if the generated program does not parse back.
#[derive(Debug, Clone, Copy, Default)]
pub struct Generation;

impl Generation {
    pub fn new() -> Self {
        Self
    }
}

impl Runnable<Vec<Node>, String> for Generation {
    fn run(&self, input: Vec<Node>) -> Result<String, TransformError> {
        let source = generate(&input);
        parse(&source).map_err(|e| TransformError {
            stage: "Generation",
            message: e.to_string(),
        })?;
        tracing::debug!(bytes = source.len(), "generated program");
        Ok(source)
    }
}
