//! Compiled templates
//!
//! A [`Template`] is the lowered tree of one template source. It is built once and rendered any
//! number of times, by either back end:
//!
//! 1. [`Template::render`] / [`Template::render_with`] walk the tree
//! 2. [`Template::generate`] / [`Template::generate_with`] compile it into a [`GeneratedTemplate`]
//!
//! Both produce the same string for the same context.

use crate::haml::ast::Node;
use crate::haml::codegen::GeneratedTemplate;
use crate::haml::config::Backend;
use crate::haml::expr::{Context, Engine, Evaluator};
use crate::haml::lowering::lower;
use crate::haml::parsing::{parse_with, ParseOptions};
use crate::haml::rendering::Renderer;

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub fn compile(source: &str) -> Self {
        Self::compile_with(source, &ParseOptions::default())
    }

    pub fn compile_with(source: &str, options: &ParseOptions) -> Self {
        Self::from_nodes(lower(&parse_with(source, options)))
    }

    /// Wrap an already lowered tree.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Render with the built-in [`Engine`].
    pub fn render(&self, context: &Context) -> String {
        self.render_with(&Engine::new(), context)
    }

    pub fn render_with<E: Evaluator + ?Sized>(&self, evaluator: &E, context: &Context) -> String {
        Renderer::new(evaluator).render(&self.nodes, context)
    }

    pub fn generate(&self) -> GeneratedTemplate {
        self.generate_with(Engine::new())
    }

    pub fn generate_with(&self, engine: Engine) -> GeneratedTemplate {
        GeneratedTemplate::from_nodes(&self.nodes, engine)
    }

    /// Render through the chosen back end.
    pub fn render_on(&self, backend: Backend, engine: Engine, context: &Context) -> String {
        match backend {
            Backend::TreeWalk => self.render_with(&engine, context),
            Backend::Generated => self.generate_with(engine).render(context),
        }
    }
}

/// Compile a template into a render function using the tree walker and the default engine.
pub fn compile(source: &str) -> impl Fn(&Context) -> String {
    let template = Template::compile(source);
    let engine = Engine::new();
    move |context: &Context| template.render_with(&engine, context)
}
