//! Expressions
//!
//! Templates never interpret expression text themselves. Every `{{ expr }}`, condition, loop
//! source and statement is handed to an [`Evaluator`] together with the current [`Context`].
//!
//! [`Engine`] is the built-in evaluator: a small, side-effect free expression language with
//! script-like value semantics (truthiness, `+` concatenation, loose `==`). It is also the target
//! language of the [source generator](crate::haml::codegen).

pub mod ast;
pub mod context;
pub mod engine;
pub mod parser;
pub mod tokens;
pub mod value;

pub use context::Context;
pub use engine::{Engine, HostFn};
pub use parser::parse;
pub use serde_json::Value;

use thiserror::Error;

/// Errors raised while evaluating an expression.
///
/// Templates never surface these: the back ends replace a failed evaluation with an empty
/// string (content) or `false` (conditions and attributes).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("syntax error in `{expression}`: {message}")]
    Syntax { expression: String, message: String },
    #[error("`{0}` is not defined")]
    Undefined(String),
    #[error("type error: {0}")]
    Type(String),
    #[error("arithmetic error: {0}")]
    Arithmetic(String),
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    #[error("function `{name}` failed: {message}")]
    Host { name: String, message: String },
}

/// Evaluates expression text against a context.
pub trait Evaluator {
    fn evaluate(&self, expression: &str, context: &Context) -> Result<Value, EvalError>;
}

/// A string literal of the expression language that evaluates to `text`.
pub fn quote(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}
