//! Embedded script runtime
//!
//! A small dynamically typed language executed by a tree-walking
//! interpreter. The REPL hands it snippets and renders whatever comes back.

pub mod ast;
pub mod builtins;
pub mod env;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod ops;
pub mod parser;
pub mod value;

#[cfg(test)]
mod tests;

pub use builtins::BUILTINS;
pub use env::Environment;
pub use error::{ErrorKind, ScriptError, ScriptResult};
pub use interpreter::{Interpreter, MAX_CALL_DEPTH};
pub use parser::parse;
pub use value::{Key, Value};
