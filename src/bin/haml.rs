//! Command-line interface for haml
//! Compiles a template file and prints the rendered HTML, the generated program or the tree.
//!
//! Usage:
//!   haml `<template>` [--context `<json>`] [--config `<toml>`] [--backend `<backend>`] [--emit `<emit>`]
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use clap::{Arg, Command};
use haml_compiler::haml::config::{HamlConfig, Loader};
use haml_compiler::haml::expr::{Context, Engine, Value};
use haml_compiler::haml::loader::{LoaderError, TemplateLoader};
use haml_compiler::haml::parsing::ParseOptions;
use haml_compiler::haml::template::Template;
use haml_compiler::haml::transforms::stages::{Assembling, Generation, Lowering};
use haml_compiler::haml::transforms::Transform;
use std::fs;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Loader(#[from] LoaderError),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("cannot read context file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid context JSON: {0}")]
    Json(#[from] serde_json::Error),
}

struct Request<'a> {
    template: &'a str,
    context: Option<&'a String>,
    config: Option<&'a String>,
    backend: Option<&'a String>,
    emit: &'a str,
}

fn main() {
    let matches = Command::new("haml")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile indentation-based templates to HTML")
        .arg_required_else_help(true)
        .arg(
            Arg::new("template")
                .help("Path to the template file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("context")
                .long("context")
                .short('c')
                .help("JSON file whose top-level object becomes the render context"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .short('b')
                .help("Back end used for rendering (overrides the configuration)")
                .value_parser(["tree-walk", "generated"]),
        )
        .arg(
            Arg::new("emit")
                .long("emit")
                .short('e')
                .help("What to print")
                .value_parser(["html", "source", "tree"])
                .default_value("html"),
        )
        .get_matches();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let request = Request {
        template: matches
            .get_one::<String>("template")
            .map(String::as_str)
            .unwrap_or_default(),
        context: matches.get_one::<String>("context"),
        config: matches.get_one::<String>("config"),
        backend: matches.get_one::<String>("backend"),
        emit: matches
            .get_one::<String>("emit")
            .map(String::as_str)
            .unwrap_or("html"),
    };

    match run(&request) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(request: &Request) -> Result<String, CliError> {
    let config = load_config(request)?;
    let options = ParseOptions::from(&config.parsing);
    let loader = TemplateLoader::from_path(request.template)?;

    let tree = Transform::from_fn(Ok)
        .then(Assembling::new(options))
        .then(Lowering::new());

    match request.emit {
        "source" => Ok(loader.with(&tree.then(Generation::new()))?),
        "tree" => {
            let nodes = loader.with(&tree)?;
            Ok(serde_json::to_string_pretty(&nodes)?)
        }
        _ => {
            let template = Template::from_nodes(loader.with(&tree)?);
            let context = load_context(request.context)?;
            tracing::debug!(backend = ?config.rendering.backend, "rendering");
            Ok(template.render_on(config.rendering.backend, Engine::new(), &context))
        }
    }
}

fn load_config(request: &Request) -> Result<HamlConfig, CliError> {
    let mut loader = Loader::new();
    if let Some(path) = request.config {
        loader = loader.with_file(path);
    }
    if let Some(backend) = request.backend {
        loader = loader.set_override("rendering.backend", backend.as_str())?;
    }
    Ok(loader.build()?)
}

fn load_context(path: Option<&String>) -> Result<Context<'static>, CliError> {
    let Some(path) = path else {
        return Ok(Context::new());
    };
    let value: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    if !value.is_object() {
        tracing::warn!(path = %path, "context is not a JSON object; rendering with no bindings");
    }
    Ok(Context::from(value))
}
