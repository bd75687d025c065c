//! Shared chains for the default [`ParseOptions`](crate::haml::parsing::ParseOptions)
//!
//! Callers with other options build their own chain from [`stages`](super::stages).

use crate::haml::ast::Node;
use crate::haml::transforms::stages::{Assembling, Generation, Lowering};
use crate::haml::transforms::Transform;
use once_cell::sync::Lazy;

/// Type alias for tree-producing transforms
pub type TreeTransform = Transform<String, Vec<Node>>;

/// Type alias for source-producing transforms
pub type SourceTransform = Transform<String, String>;

/// Source → raw tree, still carrying control markers.
///
/// # Example
///
/// ```rust
/// use haml_compiler::haml::transforms::standard::RAW_TREE;
///
/// let tree = RAW_TREE.run("- if a\n  x\n".to_string()).unwrap();
/// assert_eq!(tree[0].node_type(), "if");
/// ```
pub static RAW_TREE: Lazy<TreeTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(Assembling::default()));

/// Source → lowered tree, ready for rendering.
pub static TEMPLATE_TREE: Lazy<TreeTransform> = Lazy::new(|| {
    Transform::from_fn(Ok)
        .then(Assembling::default())
        .then(Lowering::new())
});

/// Source → generated program.
pub static GENERATED_SOURCE: Lazy<SourceTransform> = Lazy::new(|| {
    Transform::from_fn(Ok)
        .then(Assembling::default())
        .then(Lowering::new())
        .then(Generation::new())
});
