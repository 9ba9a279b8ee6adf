//! REPL Evaluation Engine
//!
//! Hands each snippet to the embedded interpreter and converts the outcome
//! into an [`EvalResult`].

use std::io::Write;
use std::time::Instant;

use tracing::debug;

use super::context::REPLContext;
use crate::repl::backend_trait::{EvalResult, ExecutionStats, REPLBackend, SymbolInfo};
use crate::runtime::{Interpreter, BUILTINS};

/// Evaluation Engine
///
/// A lone expression is evaluated and its value returned; anything else runs
/// as statements. A `None` value is not displayable.
#[derive(Debug, Default)]
pub struct Evaluator {
    /// Interpreter holding the shared environment
    interpreter: Interpreter,
    /// Execution context
    context: REPLContext,
}

impl Evaluator {
    /// Create a new evaluator printing to stdout
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator whose `print` output goes to `output`
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::with_output(output),
            context: REPLContext::new(),
        }
    }

    /// Evaluate code
    pub fn evaluate(
        &mut self,
        code: &str,
    ) -> EvalResult {
        let start = Instant::now();
        let outcome = self.interpreter.run(code);
        let elapsed = start.elapsed();

        match outcome {
            Ok(value) => {
                self.context.record_success(elapsed);
                debug!(?elapsed, has_value = value.is_some(), "evaluation finished");
                match value {
                    Some(value) if !value.is_none() => EvalResult::Value(value),
                    _ => EvalResult::Ok,
                }
            }
            Err(e) => {
                self.context.record_failure(elapsed);
                debug!(?elapsed, error = %e, "evaluation failed");
                EvalResult::Error(e.to_string())
            }
        }
    }

}

impl REPLBackend for Evaluator {
    fn eval(
        &mut self,
        code: &str,
    ) -> EvalResult {
        self.evaluate(code)
    }

    fn complete(
        &self,
        prefix: &str,
    ) -> Vec<String> {
        let mut names: Vec<String> = self
            .interpreter
            .globals()
            .names()
            .chain(BUILTINS.names())
            .filter(|name| name.starts_with(prefix))
            .map(str::to_string)
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn get_symbols(&self) -> Vec<SymbolInfo> {
        REPLContext::symbols(self.interpreter.globals())
    }

    fn clear(&mut self) {
        // statistics survive a clear
        self.interpreter.clear();
    }

    fn stats(&self) -> ExecutionStats {
        self.context.stats()
    }
}
