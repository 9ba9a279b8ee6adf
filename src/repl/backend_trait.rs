//! REPL Backend Trait
//!
//! Defines the interface between the REPL front end and whatever executes the
//! submitted snippets.

use std::time::Duration;

use crate::runtime::Value;

/// Evaluation result
#[derive(Debug)]
pub enum EvalResult {
    /// Evaluation produced a displayable value
    Value(Value),
    /// Evaluation produced nothing to display
    Ok,
    /// Execution raised an error, already formatted for display
    Error(String),
}

impl EvalResult {
    pub fn is_error(&self) -> bool {
        matches!(self, EvalResult::Error(_))
    }
}

/// A binding in the shared environment
#[derive(Debug, Clone)]
pub struct SymbolInfo {
    /// Symbol name
    pub name: String,
    /// Runtime type name
    pub type_name: String,
    /// Rendered value
    pub value: String,
    /// Whether the value is a function
    pub callable: bool,
}

impl SymbolInfo {
    /// `__name__`-style names are hidden from listings
    pub fn is_dunder(&self) -> bool {
        self.name.starts_with("__") && self.name.ends_with("__")
    }
}

/// Execution statistics
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExecutionStats {
    /// Number of evaluations that completed without error
    pub eval_count: usize,
    /// Number of evaluations that raised an error
    pub error_count: usize,
    /// Total time spent evaluating
    pub total_time: Duration,
}

/// REPL Backend Trait
///
/// Every backend owns one shared environment that persists across calls to
/// [`REPLBackend::eval`] until [`REPLBackend::clear`].
pub trait REPLBackend {
    /// Evaluate a snippet
    fn eval(
        &mut self,
        code: &str,
    ) -> EvalResult;

    /// Names starting with `prefix` that the backend can resolve, sorted
    fn complete(
        &self,
        prefix: &str,
    ) -> Vec<String>;

    /// Current bindings, in definition order
    fn get_symbols(&self) -> Vec<SymbolInfo>;

    /// Drop every binding
    fn clear(&mut self);

    /// Get execution statistics
    fn stats(&self) -> ExecutionStats;
}
