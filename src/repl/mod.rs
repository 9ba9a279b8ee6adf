//! REPL Module
//!
//! This module contains:
//! - [`backend_trait::REPLBackend`] - Abstract interface for REPL backends
//! - [`engine::Evaluator`] - Pass-through evaluator over the embedded runtime
//! - [`session::Session`] - History, token logs and console for one run
//! - [`commands::CommandHandler`] - Command processor
//! - [`line::LineREPL`] - Block-reading loop over a [`line::LineReader`]
//! - [`debug`] - Step-through debug mode

pub mod backend_trait;
pub mod commands;
pub mod console;
pub mod debug;
pub mod engine;
pub mod error;
pub mod line;
pub mod session;

#[cfg(test)]
mod tests;

pub use backend_trait::{EvalResult, ExecutionStats, REPLBackend, SymbolInfo};
pub use commands::{Command, CommandHandler, CommandResult, COMMANDS};
pub use console::{Console, SharedWriter, Tone};
pub use engine::{Evaluator, REPLContext};
pub use error::ReplError;
pub use line::{LineREPL, LineREPLConfig, LineReader, ReadOutcome, RustylineReader, ScriptedInput, ScriptedReader};
pub use session::Session;
