//! Source generation
//!
//! Compiles a lowered tree into one program of the [expression language](crate::haml::expr):
//! a single string concatenation that, evaluated against a context, yields the same HTML the
//! [tree walker](crate::haml::rendering) would.
//!
//! Every fragment evaluates to a string, so an element's pieces are spliced into the enclosing
//! concatenation instead of being parenthesized. Sibling and nested elements therefore add terms
//! to one flat chain, not nesting depth.
//!
//! Node forms:
//!
//! ```text
//! Text            "literal"                      (adjacent static text is merged)
//! Expression      escape(try((expr), null))      str(...) when raw
//! Statement       discard(code)
//! Element         "<tag k=\"v\"" + attr("k", try((expr), false)) + ">" + children + "</tag>"
//! DecisionChain   (try((c0), false) ? body0 : try((c1), false) ? body1 : else-or-"")
//! For             for (item, index in try((items), null)) { body }
//! Fragment        its children, inline
//! ```
//!
//! `try` reproduces the tree walker's fallbacks for failed evaluations. An expression that does
//! not even parse would always take its fallback, so it is folded away here: its output, its
//! attribute, its branch or its loop is simply omitted.

use crate::haml::ast::{AttrValue, Attributes, Branch, Guard, Node};
use crate::haml::expr::ast::Expr;
use crate::haml::expr::value::stringify;
use crate::haml::expr::{parse, quote, Context, Engine};

/// Concatenation builder that merges adjacent static text into one literal.
#[derive(Default)]
struct Concat {
    pieces: Vec<String>,
    text: String,
}

impl Concat {
    fn text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn code(&mut self, code: String) {
        self.flush();
        self.pieces.push(code);
    }

    fn flush(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.pieces.push(quote(&text));
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        if self.pieces.is_empty() {
            quote("")
        } else {
            self.pieces.join(" + ")
        }
    }
}

/// Generate the program for a lowered node list.
pub fn generate(nodes: &[Node]) -> String {
    let mut out = Concat::default();
    push_nodes(&mut out, nodes);
    out.finish()
}

fn push_nodes(out: &mut Concat, nodes: &[Node]) {
    for node in nodes {
        push_node(out, node);
    }
}

fn push_node(out: &mut Concat, node: &Node) {
    match node {
        Node::Element {
            tag,
            attributes,
            children,
        } => push_element(out, tag, attributes, children),
        Node::Text { value } => out.text(value),
        Node::Expression { value, raw } => {
            if let Some(value) = guarded(value, "null") {
                let function = if *raw { "str" } else { "escape" };
                out.code(format!("{}({})", function, value));
            }
        }
        Node::Statement { code } => {
            if parses(code) {
                out.code(format!("discard({})", code));
            }
        }
        Node::For {
            variable,
            index_variable,
            expression,
            children,
        } => {
            if let Some(items) = guarded(expression, "null") {
                let bindings = match index_variable {
                    Some(index) => format!("{}, {}", variable, index),
                    None => variable.clone(),
                };
                out.code(format!(
                    "for ({} in {}) {{ {} }}",
                    bindings,
                    items,
                    generate(children)
                ));
            }
        }
        Node::DecisionChain { branches } => out.code(decision_chain(branches)),
        Node::Fragment { children } => push_nodes(out, children),
        Node::If { .. } | Node::ElseIf { .. } | Node::Else { .. } => {}
    }
}

fn push_element(out: &mut Concat, tag: &str, attributes: &Attributes, children: &[Node]) {
    out.text(&format!("<{}", tag));
    for (key, value) in attributes {
        match value {
            AttrValue::Literal(text) => out.text(&format!(" {}=\"{}\"", key, text)),
            AttrValue::Expr { value, raw } => {
                if let Some(value) = guarded(value, "false") {
                    let function = if *raw { "raw_attr" } else { "attr" };
                    out.code(format!("{}({}, {})", function, quote(key), value));
                }
            }
        }
    }
    out.text(">");
    push_nodes(out, children);
    out.text(&format!("</{}>", tag));
}

fn decision_chain(branches: &[Branch]) -> String {
    let mut code = String::from("(");
    let mut closed = false;
    for branch in branches {
        match &branch.guard {
            Guard::Always => {
                code.push_str(&generate(&branch.children));
                closed = true;
                break;
            }
            Guard::Expr(condition) => {
                if let Some(test) = guarded(condition, "false") {
                    code.push_str(&format!("{} ? {} : ", test, generate(&branch.children)));
                }
            }
        }
    }
    if !closed {
        code.push_str(&quote(""));
    }
    code.push(')');
    code
}

fn parses(expression: &str) -> bool {
    match parse(expression) {
        Ok(_) => true,
        Err(error) => {
            tracing::trace!(%error, "expression folded to its fallback");
            false
        }
    }
}

/// `try((expression), fallback)`, or `None` when the expression cannot parse.
fn guarded(expression: &str, fallback: &str) -> Option<String> {
    parses(expression).then(|| format!("try(({}), {})", expression, fallback))
}

/// A generated program, parsed once and evaluated per render.
#[derive(Debug, Clone)]
pub struct GeneratedTemplate {
    source: String,
    program: Option<Expr>,
    engine: Engine,
}

impl GeneratedTemplate {
    pub fn new(source: String, engine: Engine) -> Self {
        let program = match engine.parse(&source) {
            Ok(program) => Some(program),
            Err(error) => {
                tracing::warn!(%error, "generated program does not parse");
                None
            }
        };
        Self {
            source,
            program,
            engine,
        }
    }

    pub fn from_nodes(nodes: &[Node], engine: Engine) -> Self {
        Self::new(generate(nodes), engine)
    }

    /// The program text.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn render(&self, context: &Context) -> String {
        let Some(program) = &self.program else {
            return String::new();
        };
        match self.engine.eval(program, context) {
            Ok(value) => stringify(&value),
            Err(error) => {
                tracing::warn!(%error, "generated program failed");
                String::new()
            }
        }
    }
}
