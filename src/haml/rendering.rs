//! Tree-walking renderer
//!
//! Renders a lowered tree directly: a recursive walk with no state beyond the context passed
//! down. Every evaluation goes through the [`Evaluator`]; a failed evaluation never aborts the
//! render but is replaced with a fallback:
//!
//! - content expressions render as the empty string
//! - conditions count as `false`
//! - attribute expressions count as `false` (the attribute is omitted)
//! - loop sources that fail or are not arrays render nothing
//! - statements are evaluated for effect and their failures ignored
//!
//! Orphan `If`/`ElseIf`/`Else` markers render nothing.

pub mod html;

use crate::haml::ast::{AttrValue, Guard, Node};
use crate::haml::expr::value::{is_truthy, stringify};
use crate::haml::expr::{Context, EvalError, Evaluator, Value};
use html::{escape_value, render_attribute};

pub struct Renderer<'e, E: Evaluator + ?Sized> {
    evaluator: &'e E,
}

impl<'e, E: Evaluator + ?Sized> Renderer<'e, E> {
    pub fn new(evaluator: &'e E) -> Self {
        Self { evaluator }
    }

    pub fn render(&self, nodes: &[Node], context: &Context) -> String {
        let mut out = String::new();
        self.render_into(&mut out, nodes, context);
        out
    }

    fn render_into(&self, out: &mut String, nodes: &[Node], context: &Context) {
        for node in nodes {
            self.render_node(out, node, context);
        }
    }

    fn render_node(&self, out: &mut String, node: &Node, context: &Context) {
        match node {
            Node::Element {
                tag,
                attributes,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (key, value) in attributes {
                    match value {
                        AttrValue::Literal(text) => {
                            out.push_str(&format!(" {}=\"{}\"", key, text));
                        }
                        AttrValue::Expr { value, raw } => {
                            let result = self.evaluate_or(value, Value::Bool(false), context);
                            out.push_str(&render_attribute(key, &result, *raw));
                        }
                    }
                }
                out.push('>');
                self.render_into(out, children, context);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            Node::Text { value } => out.push_str(value),
            Node::Expression { value, raw } => {
                let result = self.evaluate_or(value, Value::Null, context);
                if *raw {
                    out.push_str(&stringify(&result));
                } else {
                    out.push_str(&escape_value(&result));
                }
            }
            Node::Statement { code } => {
                self.evaluate_or(code, Value::Null, context);
            }
            Node::For {
                variable,
                index_variable,
                expression,
                children,
            } => {
                let Value::Array(items) = self.evaluate_or(expression, Value::Null, context) else {
                    return;
                };
                for (index, item) in items.into_iter().enumerate() {
                    let mut scope = context.child();
                    scope.bind(variable.clone(), item);
                    if let Some(index_variable) = index_variable {
                        scope.bind(index_variable.clone(), Value::from(index));
                    }
                    self.render_into(out, children, &scope);
                }
            }
            Node::DecisionChain { branches } => {
                let taken = branches.iter().find(|branch| match &branch.guard {
                    Guard::Always => true,
                    Guard::Expr(condition) => {
                        let result = self.evaluate_or(condition, Value::Bool(false), context);
                        is_truthy(&result)
                    }
                });
                if let Some(branch) = taken {
                    self.render_into(out, &branch.children, context);
                }
            }
            Node::Fragment { children } => self.render_into(out, children, context),
            Node::If { .. } | Node::ElseIf { .. } | Node::Else { .. } => {}
        }
    }

    fn evaluate_or(&self, expression: &str, fallback: Value, context: &Context) -> Value {
        self.evaluator
            .evaluate(expression, context)
            .unwrap_or_else(|error: EvalError| {
                tracing::trace!(expression, %error, "evaluation failed");
                fallback
            })
    }
}
