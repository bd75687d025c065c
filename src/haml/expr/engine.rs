//! The built-in expression engine
//!
//! [`Engine`] parses expression text and interprets it against a [`Context`]. Besides host
//! functions registered with [`Engine::with_function`], a few template intrinsics are always
//! callable:
//!
//! | call                | result                                                        |
//! |---------------------|---------------------------------------------------------------|
//! | `escape(v)`         | HTML-escaped string form of `v`                               |
//! | `str(v)`            | string form of `v`                                            |
//! | `attr(k, v)`        | ` k="v"` (escaped), ` k` for `true`, nothing for `false`/null |
//! | `raw_attr(k, v)`    | like `attr`, without escaping                                 |
//! | `try(v, fallback)`  | `v`, or `fallback` if evaluating `v` fails                    |
//! | `discard(v)`        | `""`; evaluates `v` and ignores its result or failure         |
//!
//! Intrinsics take precedence over host functions of the same name.

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::context::Context;
use super::parser::parse;
use super::value::{
    compare, concatenates, is_truthy, kind, loose_equals, number_value, strict_equals, stringify,
    to_number,
};
use super::{EvalError, Evaluator};
use crate::haml::rendering::html::{escape_value, render_attribute};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// A host function callable from expressions.
pub type HostFn = Box<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>;

#[derive(Clone, Default)]
pub struct Engine {
    functions: Arc<HashMap<String, Arc<HostFn>>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("functions", &format!("<{} functions>", self.functions.len()))
            .finish()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a host function.
    pub fn with_function<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        let functions = Arc::make_mut(&mut self.functions);
        functions.insert(name.into(), Arc::new(Box::new(function)));
        self
    }

    pub fn parse(&self, source: &str) -> Result<Expr, EvalError> {
        parse(source)
    }

    /// Interpret an already parsed expression.
    pub fn eval(&self, expr: &Expr, context: &Context) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Number(n) => number_value(*n),
            Expr::Variable(name) => context
                .lookup(name)
                .cloned()
                .ok_or_else(|| EvalError::Undefined(name.clone())),
            Expr::Array(items) => items
                .iter()
                .map(|item| self.eval(item, context))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Expr::Object(entries) => {
                let mut object = Map::new();
                for (key, value) in entries {
                    object.insert(key.clone(), self.eval(value, context)?);
                }
                Ok(Value::Object(object))
            }
            Expr::Member(target, name) => member(&self.eval(target, context)?, name),
            Expr::Index(target, index) => {
                let target = self.eval(target, context)?;
                let index = self.eval(index, context)?;
                element(&target, &index)
            }
            Expr::Call(name, args) => self.call(name, args, context),
            Expr::Unary(op, operand) => {
                let value = self.eval(operand, context)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!is_truthy(&value))),
                    UnaryOp::Neg => number_value(-numeric(&value)?),
                }
            }
            Expr::Chain(first, rest) => self.chain(first, rest, context),
            Expr::Conditional(condition, then, otherwise) => {
                if is_truthy(&self.eval(condition, context)?) {
                    self.eval(then, context)
                } else {
                    self.eval(otherwise, context)
                }
            }
            Expr::For {
                variable,
                index_variable,
                items,
                body,
            } => {
                let Value::Array(items) = self.eval(items, context)? else {
                    return Ok(Value::String(String::new()));
                };
                let mut out = String::new();
                for (index, item) in items.into_iter().enumerate() {
                    let mut scope = context.child();
                    scope.bind(variable.clone(), item);
                    if let Some(index_variable) = index_variable {
                        scope.bind(index_variable.clone(), Value::from(index));
                    }
                    out.push_str(&stringify(&self.eval(body, &scope)?));
                }
                Ok(Value::String(out))
            }
        }
    }

    /// Fold a flat operator chain left to right.
    fn chain(
        &self,
        first: &Expr,
        rest: &[(BinaryOp, Expr)],
        context: &Context,
    ) -> Result<Value, EvalError> {
        let mut left = self.eval(first, context)?;
        for (op, rhs) in rest {
            left = self.binary(*op, left, rhs, context)?;
        }
        Ok(left)
    }

    fn binary(
        &self,
        op: BinaryOp,
        left: Value,
        rhs: &Expr,
        context: &Context,
    ) -> Result<Value, EvalError> {
        // Logical operators short-circuit and yield an operand
        match op {
            BinaryOp::And if !is_truthy(&left) => return Ok(left),
            BinaryOp::Or if is_truthy(&left) => return Ok(left),
            BinaryOp::And | BinaryOp::Or => return self.eval(rhs, context),
            _ => {}
        }
        let right = self.eval(rhs, context)?;
        match op {
            BinaryOp::Add if concatenates(&left, &right) => {
                let mut text = match left {
                    Value::String(text) => text,
                    other => stringify(&other),
                };
                text.push_str(&stringify(&right));
                Ok(Value::String(text))
            }
            BinaryOp::Add => number_value(numeric(&left)? + numeric(&right)?),
            BinaryOp::Sub => number_value(numeric(&left)? - numeric(&right)?),
            BinaryOp::Mul => number_value(numeric(&left)? * numeric(&right)?),
            BinaryOp::Div => number_value(numeric(&left)? / numeric(&right)?),
            BinaryOp::Rem => number_value(numeric(&left)? % numeric(&right)?),
            BinaryOp::Lt => Ok(Value::Bool(compare(&left, &right) == Some(Ordering::Less))),
            BinaryOp::Le => Ok(Value::Bool(matches!(
                compare(&left, &right),
                Some(Ordering::Less | Ordering::Equal)
            ))),
            BinaryOp::Gt => Ok(Value::Bool(
                compare(&left, &right) == Some(Ordering::Greater),
            )),
            BinaryOp::Ge => Ok(Value::Bool(matches!(
                compare(&left, &right),
                Some(Ordering::Greater | Ordering::Equal)
            ))),
            BinaryOp::Eq => Ok(Value::Bool(loose_equals(&left, &right))),
            BinaryOp::Ne => Ok(Value::Bool(!loose_equals(&left, &right))),
            BinaryOp::StrictEq => Ok(Value::Bool(strict_equals(&left, &right))),
            BinaryOp::StrictNe => Ok(Value::Bool(!strict_equals(&left, &right))),
            BinaryOp::And | BinaryOp::Or => Ok(right),
        }
    }

    fn call(&self, name: &str, args: &[Expr], context: &Context) -> Result<Value, EvalError> {
        match (name, args) {
            ("try", [value, fallback]) => {
                return match self.eval(value, context) {
                    Ok(value) => Ok(value),
                    Err(error) => {
                        tracing::trace!(%error, "evaluation failed, using fallback");
                        self.eval(fallback, context)
                    }
                }
            }
            ("discard", [value]) => {
                if let Err(error) = self.eval(value, context) {
                    tracing::trace!(%error, "statement failed");
                }
                return Ok(Value::String(String::new()));
            }
            _ => {}
        }

        let values = args
            .iter()
            .map(|arg| self.eval(arg, context))
            .collect::<Result<Vec<_>, _>>()?;
        match (name, values.as_slice()) {
            ("escape", [value]) => Ok(Value::String(escape_value(value))),
            ("str", [value]) => Ok(Value::String(stringify(value))),
            ("attr", [key, value]) => Ok(Value::String(render_attribute(
                &stringify(key),
                value,
                false,
            ))),
            ("raw_attr", [key, value]) => Ok(Value::String(render_attribute(
                &stringify(key),
                value,
                true,
            ))),
            ("escape" | "str" | "attr" | "raw_attr" | "try" | "discard", _) => Err(
                EvalError::Type(format!("wrong number of arguments to `{}`", name)),
            ),
            _ => {
                let function = self
                    .functions
                    .get(name)
                    .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
                function(&values).map_err(|message| EvalError::Host {
                    name: name.to_string(),
                    message,
                })
            }
        }
    }
}

impl Evaluator for Engine {
    fn evaluate(&self, expression: &str, context: &Context) -> Result<Value, EvalError> {
        let expr = self.parse(expression)?;
        self.eval(&expr, context)
    }
}

fn numeric(value: &Value) -> Result<f64, EvalError> {
    to_number(value).ok_or_else(|| {
        EvalError::Arithmetic(format!("{} is not a number", kind(value)))
    })
}

fn member(target: &Value, name: &str) -> Result<Value, EvalError> {
    match target {
        Value::Null => Err(EvalError::Type(format!(
            "cannot read property `{}` of null",
            name
        ))),
        Value::Object(object) => Ok(object.get(name).cloned().unwrap_or(Value::Null)),
        Value::Array(items) if name == "length" => Ok(Value::from(items.len())),
        Value::String(text) if name == "length" => Ok(Value::from(text.chars().count())),
        _ => Ok(Value::Null),
    }
}

fn element(target: &Value, index: &Value) -> Result<Value, EvalError> {
    match (target, index) {
        (Value::Null, _) => Err(EvalError::Type(format!(
            "cannot index null with `{}`",
            stringify(index)
        ))),
        (Value::Array(items), Value::Number(n)) => Ok(n
            .as_u64()
            .and_then(|i| items.get(i as usize))
            .cloned()
            .unwrap_or(Value::Null)),
        (Value::String(text), Value::Number(n)) => Ok(n
            .as_u64()
            .and_then(|i| text.chars().nth(i as usize))
            .map(|c| Value::String(c.to_string()))
            .unwrap_or(Value::Null)),
        (target, index) => member(target, &stringify(index)),
    }
}
