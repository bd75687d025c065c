//! Render contexts
//!
//! A [`Context`] is one scope of named values with an optional parent. Loops never modify the
//! context they were given: each iteration renders against a [child](Context::child) scope that
//! shadows the loop variables over its parent.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default)]
pub struct Context<'p> {
    bindings: Map<String, Value>,
    parent: Option<&'p Context<'p>>,
}

impl<'p> Context<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new empty scope on top of `self`.
    pub fn child(&self) -> Context<'_> {
        Context {
            bindings: Map::new(),
            parent: Some(self),
        }
    }

    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Builder form of [`bind`](Self::bind).
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.bind(name, value);
        self
    }

    /// Resolve a name, innermost scope first.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        match self.bindings.get(name) {
            Some(value) => Some(value),
            None => self.parent.and_then(|parent| parent.lookup(name)),
        }
    }
}

impl From<Value> for Context<'static> {
    /// Object members become bindings; any other value gives an empty context.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(bindings) => Context {
                bindings,
                parent: None,
            },
            _ => Context::new(),
        }
    }
}

impl From<Map<String, Value>> for Context<'static> {
    fn from(bindings: Map<String, Value>) -> Self {
        Context {
            bindings,
            parent: None,
        }
    }
}
