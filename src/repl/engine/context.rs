//! REPL Execution Context
//!
//! Session bookkeeping that lives beside the interpreter: how many snippets
//! ran and how long they took.

use std::time::Duration;

use crate::repl::backend_trait::{ExecutionStats, SymbolInfo};
use crate::runtime::Environment;

/// REPL Execution Context
#[derive(Debug, Default)]
pub struct REPLContext {
    /// Successful evaluations this session
    eval_count: usize,
    /// Failed evaluations this session
    error_count: usize,
    /// Total evaluation time
    total_time: Duration,
}

impl REPLContext {
    /// Create a new context
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an evaluation that completed
    pub fn record_success(
        &mut self,
        duration: Duration,
    ) {
        self.eval_count += 1;
        self.total_time += duration;
    }

    /// Record an evaluation that raised an error
    pub fn record_failure(
        &mut self,
        duration: Duration,
    ) {
        self.error_count += 1;
        self.total_time += duration;
    }

    /// Get statistics
    pub fn stats(&self) -> ExecutionStats {
        ExecutionStats {
            eval_count: self.eval_count,
            error_count: self.error_count,
            total_time: self.total_time,
        }
    }

    /// Describe every binding of `env`
    pub fn symbols(env: &Environment) -> Vec<SymbolInfo> {
        env.iter()
            .map(|(name, value)| SymbolInfo {
                name: name.to_string(),
                type_name: value.type_name().to_string(),
                value: value.to_string(),
                callable: value.is_callable(),
            })
            .collect()
    }
}
