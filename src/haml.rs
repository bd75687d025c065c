//! Main module for haml library functionality

pub mod ast;
pub mod codegen;
pub mod config;
pub mod expr;
pub mod lexing;
pub mod loader;
pub mod lowering;
pub mod parsing;
pub mod rendering;
pub mod template;
pub mod transforms;
