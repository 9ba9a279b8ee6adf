//! snippet-repl
//!
//! An interactive read-eval-print loop for a small scripting language. Every
//! snippet runs against one shared environment; its tokens are logged, the
//! command history persists between sessions, and a step-through debug mode
//! shows tokens, result and environment for each line.
//!
//! # Example
//!
//! ```no_run
//! use snippet_repl::{eval, Result};
//!
//! fn main() -> Result<()> {
//!     if let Some(value) = eval("sum(range(10))")? {
//!         println!("{}", value);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(rust_2018_idioms)]

pub mod history;
pub mod repl;
pub mod runtime;
pub mod tokenizer;

// Utility modules
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::repl::{Console, Evaluator, LineREPL, LineREPLConfig, RustylineReader, Session};
use crate::runtime::{Interpreter, Value};
use crate::tokenizer::TokenLog;
use crate::util::config::ReplConfig;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Program name
pub const NAME: &str = "snippet-repl";

/// Build a REPL session from configuration
///
/// Program output from `print` goes through the same console as REPL output.
pub fn build_session(
    config: &ReplConfig,
    console: Console,
) -> Session<Evaluator> {
    let evaluator = Evaluator::with_output(Box::new(console.writer()));
    let token_log = TokenLog::new(&config.tokens_file, &config.error_tokens_file);
    Session::new(evaluator, console, &config.history_file, token_log)
}

/// Start the interactive REPL on the terminal
pub fn start_repl(config: &ReplConfig) -> Result<()> {
    debug!(history = %config.history_file.display(), "starting interactive session");
    let session = build_session(config, Console::stdout(config.colors));
    let reader = RustylineReader::new(config.vi_mode).context("Failed to initialize line editor")?;
    let line_config = LineREPLConfig {
        prompt: config.prompt.clone(),
        continuation_prompt: config.continuation_prompt.clone(),
        ..LineREPLConfig::default()
    };
    LineREPL::new(session, reader, line_config).run()?;
    Ok(())
}

/// Evaluate one snippet in a fresh environment
///
/// Returns the value of a lone expression; `None` values and statements
/// yield nothing.
pub fn eval(source: &str) -> Result<Option<Value>> {
    debug!("evaluating snippet");
    let mut interpreter = Interpreter::new();
    let value = interpreter.run(source)?;
    Ok(value.filter(|v| !v.is_none()))
}

/// Execute source code for its effects
pub fn run(source: &str) -> Result<()> {
    let mut interpreter = Interpreter::new();
    interpreter.exec(source)?;
    Ok(())
}

/// Execute a source file
pub fn run_file(path: &Path) -> Result<()> {
    debug!(path = %path.display(), "running file");
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    run(&source)
}
