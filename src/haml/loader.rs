//! Template loading utilities
//!
//! `TemplateLoader` loads template source from a file or a string and runs transforms on it.
//! The CLI and the integration tests both go through it.
//!
//! ```rust,ignore
//! use haml_compiler::haml::loader::TemplateLoader;
//! use haml_compiler::haml::transforms::standard::GENERATED_SOURCE;
//!
//! let template = TemplateLoader::from_path("page.haml")?.compile()?;
//! let program = TemplateLoader::from_string("%p hi").with(&GENERATED_SOURCE)?;
//! ```

use crate::haml::ast::Node;
use crate::haml::template::Template;
use crate::haml::transforms::standard::{RAW_TREE, TEMPLATE_TREE};
use crate::haml::transforms::{Transform, TransformError};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error that can occur when loading templates
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoaderError {
    /// IO error when reading file
    #[error("IO error: {0}")]
    IoError(String),
    /// Pipeline stage error
    #[error("Transform error: {0}")]
    TransformError(#[from] TransformError),
}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::IoError(err.to_string())
    }
}

/// Template source with transform shortcuts.
pub struct TemplateLoader {
    source: String,
}

impl TemplateLoader {
    /// Load from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), bytes = source.len(), "loaded template");
        Ok(TemplateLoader { source })
    }

    pub fn from_string<S: Into<String>>(source: S) -> Self {
        TemplateLoader {
            source: source.into(),
        }
    }

    /// Run a custom transform on the source
    ///
    /// This is the generic method that all shortcuts use internally.
    pub fn with<O: 'static>(&self, transform: &Transform<String, O>) -> Result<O, LoaderError> {
        Ok(transform.run(self.source.clone())?)
    }

    /// The tree as built, before control flow is lowered.
    ///
    /// Shortcut for `.with(&RAW_TREE)`.
    pub fn raw_tree(&self) -> Result<Vec<Node>, LoaderError> {
        self.with(&RAW_TREE)
    }

    /// Compile the source into a renderable template.
    pub fn compile(&self) -> Result<Template, LoaderError> {
        self.with(&TEMPLATE_TREE).map(Template::from_nodes)
    }

    /// Get the raw source string
    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haml::expr::Context;
    use crate::haml::transforms::standard::GENERATED_SOURCE;

    #[test]
    fn test_from_string() {
        let loader = TemplateLoader::from_string("%p hi");
        assert_eq!(loader.source(), "%p hi");
        assert_eq!(loader.compile().unwrap().render(&Context::new()), "<p>hi</p>");
    }

    #[test]
    fn test_raw_tree_keeps_markers() {
        let tree = TemplateLoader::from_string("- if a\n  x\n- else\n  y")
            .raw_tree()
            .unwrap();
        let kinds: Vec<_> = tree.iter().map(Node::node_type).collect();
        assert_eq!(kinds, vec!["if", "else"]);
    }

    #[test]
    fn test_custom_transform() {
        let program = TemplateLoader::from_string("= x")
            .with(&GENERATED_SOURCE)
            .unwrap();
        assert_eq!(program, "escape(try((x), null))");
    }

    #[test]
    fn test_missing_file() {
        let result = TemplateLoader::from_path("/nonexistent/template.haml");
        assert!(matches!(result, Err(LoaderError::IoError(_))));
    }
}
