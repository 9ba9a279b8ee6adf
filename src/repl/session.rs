//! REPL session state
//!
//! Everything a running REPL owns apart from its input source: the backend,
//! the command history, the token logs and the console.

use std::path::PathBuf;

use tracing::warn;

use super::backend_trait::{EvalResult, REPLBackend};
use super::console::{Console, Tone};
use crate::history::{CommandHistory, LoadOutcome};
use crate::tokenizer::{tokenize, Token, TokenLog, TokenLogKind};

const BANNER: &str = "
╔════════════════════════════════════╗
║          🔁 SNIPPET REPL           ║
╚════════════════════════════════════╝";

pub struct Session<B: REPLBackend> {
    backend: B,
    history: CommandHistory,
    history_path: PathBuf,
    token_log: TokenLog,
    console: Console,
}

impl<B: REPLBackend> Session<B> {
    pub fn new(
        backend: B,
        console: Console,
        history_path: impl Into<PathBuf>,
        token_log: TokenLog,
    ) -> Self {
        Self {
            backend,
            history: CommandHistory::new(),
            history_path: history_path.into(),
            token_log,
            console,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn token_log(&self) -> &TokenLog {
        &self.token_log
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn print_banner(&self) {
        self.console.line(Tone::Banner, BANNER);
        self.console
            .line(Tone::Notice, "Type 'help' to view available commands.");
        self.console.blank();
    }

    pub fn load_history(&mut self) {
        match self.history.load(&self.history_path) {
            Ok(LoadOutcome::Loaded(_)) => self.console.line(Tone::Success, "📂 History loaded."),
            Ok(LoadOutcome::Missing) => self.console.line(Tone::Notice, "ℹ No history file found."),
            Err(e) => {
                warn!(error = %e, "loading history failed");
                self.console
                    .line(Tone::Error, &format!("❌ Error loading history: {}", e));
            }
        }
    }

    pub fn save_history(&self) {
        match self.history.save(&self.history_path) {
            Ok(()) => self.console.line(Tone::Success, "💾 History saved."),
            Err(e) => {
                warn!(error = %e, "saving history failed");
                self.console
                    .line(Tone::Error, &format!("❌ Error saving history: {}", e));
            }
        }
    }

    /// Append to a token log, reporting failures on the console
    pub fn log_tokens(
        &self,
        kind: TokenLogKind,
        tokens: &[Token],
    ) {
        if let Err(e) = self.token_log.append(kind, tokens) {
            warn!(error = %e, "saving tokens failed");
            self.console
                .line(Tone::Error, &format!("❌ Error saving tokens: {}", e));
        }
    }

    /// Evaluate `code`; on error its tokens go to the error log
    pub fn evaluate(
        &mut self,
        code: &str,
    ) -> EvalResult {
        let result = self.backend.eval(code);
        if result.is_error() {
            self.log_tokens(TokenLogKind::Error, &tokenize(code));
        }
        result
    }

    /// Run user code from the main prompt
    pub fn submit(
        &mut self,
        code: &str,
    ) {
        self.history.add(code);
        let result = self.evaluate(code);
        if !result.is_error() {
            self.log_tokens(TokenLogKind::Success, &tokenize(code));
        }
        self.display(&result);
    }

    fn display(
        &self,
        result: &EvalResult,
    ) {
        match result {
            EvalResult::Value(value) => {
                self.console.line(Tone::Banner, "🎯 Output:");
                self.console.line(Tone::Value, &value.to_string());
            }
            EvalResult::Error(message) => self.show_error(message),
            EvalResult::Ok => {}
        }
    }

    pub fn show_error(
        &self,
        message: &str,
    ) {
        let label = self.console.paint(Tone::Error, "⚠ Error: ");
        self.console.raw(&format!("{}{}\n", label, message));
    }
}
