//! # haml-compiler
//!
//! A compiler for an indentation-based HTML markup language: element shorthand
//! (`%tag.class#id`, `.class`), embedded `{{ expressions }}` and `- if` / `- for`
//! control flow.
//!
//! File Layout
//!
//! Compilation is a short pipeline of independent stages. Each one has its own module under
//! src/haml and can be run on its own through the [transforms](haml::transforms) module:
//!
//! src/haml
//!   ├── lexing       Line classification, `{{ }}` segmentation and brace/backtick scanning
//!   ├── parsing      Attribute scanning and the indentation tree builder
//!   ├── lowering     Folding if / else-if / else runs into decision chains
//!   ├── rendering    The tree-walking back end
//!   ├── codegen      The source-generating back end
//!   ├── expr         The expression delegate contract and the built-in engine
//!   ├── transforms   Typed pipeline stages and the standard pipelines
//!   ├── loader       Loading template files through a pipeline
//!   ├── config       Layered TOML configuration over embedded defaults
//!   └── template     The compiled template and the `compile` entry point
//!
//! The two back ends share one contract: for any template and context they produce the same
//! string. Tests run every scenario against both.

pub mod haml;

pub use haml::expr::{Context, Engine, EvalError, Evaluator};
pub use haml::template::{compile, Template};
