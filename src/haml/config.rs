//! Settings for parsing and back-end selection
//!
//! The shipped `defaults/haml.default.toml` is compiled in and always forms the bottom layer.

use crate::haml::parsing::ParseOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/haml.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HamlConfig {
    pub parsing: ParsingConfig,
    pub rendering: RenderingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsingConfig {
    pub default_tag: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderingConfig {
    pub backend: Backend,
}

/// Which back end turns a compiled tree into HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    TreeWalk,
    Generated,
}

impl From<&ParsingConfig> for ParseOptions {
    fn from(config: &ParsingConfig) -> Self {
        ParseOptions {
            default_tag: config.default_tag.clone(),
        }
    }
}

/// Settings sources, lowest priority first: embedded defaults, then files, then overrides.
#[derive(Debug, Clone)]
pub struct Loader {
    sources: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        Loader {
            sources: Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// Add a TOML file; `build` fails if it cannot be read.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        let file = File::from(path.as_ref()).format(FileFormat::Toml);
        Loader {
            sources: self.sources.add_source(file),
        }
    }

    /// Set one dotted key, such as `rendering.backend`.
    pub fn set_override<V: Into<ValueKind>>(self, key: &str, value: V) -> Result<Self, ConfigError> {
        Ok(Loader {
            sources: self.sources.set_override(key, value)?,
        })
    }

    pub fn build(self) -> Result<HamlConfig, ConfigError> {
        self.sources.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
