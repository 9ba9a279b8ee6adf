//! Step-through debug mode
//!
//! Runs one line at a time and shows, for each step, the tokens, the result
//! and a snapshot of the environment.

use super::backend_trait::{EvalResult, REPLBackend};
use super::console::Tone;
use super::error::ReplError;
use super::line::{LineReader, ReadOutcome};
use super::session::Session;
use crate::tokenizer::{tokenize, TokenLogKind};

/// Word that leaves debug mode
pub const DONE: &str = "done";

/// How debug mode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugExit {
    /// The user typed `done`
    Done,
    /// Ctrl-C
    Interrupted,
    /// End of input
    Eof,
}

/// Run debug mode until `done`, an interrupt or end of input
pub fn run<B: REPLBackend, R: LineReader>(
    session: &mut Session<B>,
    reader: &mut R,
    prompt: &str,
) -> Result<DebugExit, ReplError> {
    session
        .console()
        .line(Tone::Notice, "🐞 Debug mode: Enter lines one by one. Type 'done' to exit.");
    session.console().blank();

    let mut step = 1;
    loop {
        let line = match reader.read_line(prompt)? {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Interrupted => return Ok(DebugExit::Interrupted),
            ReadOutcome::Eof => return Ok(DebugExit::Eof),
        };
        if line.trim().eq_ignore_ascii_case(DONE) {
            return Ok(DebugExit::Done);
        }
        if line.trim().is_empty() {
            continue;
        }
        tracing::debug!(step, "debug step");
        run_step(session, step, &line);
        step += 1;
    }
}

fn run_step<B: REPLBackend>(
    session: &mut Session<B>,
    step: usize,
    line: &str,
) {
    session
        .console()
        .line(Tone::Notice, &format!("Debug Step {}:", step));
    session.console().line(Tone::Plain, &format!(">>> {}", line));

    let tokens = tokenize(line);
    session.log_tokens(TokenLogKind::Success, &tokens);
    if tokens.is_empty() {
        session.console().line(Tone::Plain, "Tokens: (none)");
    } else {
        session.console().line(Tone::Plain, "Tokens:");
        for token in &tokens {
            session.console().line(Tone::Plain, &format!("  {}", token));
        }
    }

    match session.evaluate(line) {
        EvalResult::Ok => session.console().line(Tone::Plain, "Result: None"),
        EvalResult::Error(message) => session.show_error(&message),
        EvalResult::Value(value) => {
            session.console().line(Tone::Plain, "Result:");
            session.console().line(Tone::Value, &value.to_string());
        }
    }

    let console = session.console();
    console.line(Tone::Plain, "Environment snapshot:");
    let visible: Vec<_> = session
        .backend()
        .get_symbols()
        .into_iter()
        .filter(|s| !s.callable && !s.is_dunder())
        .collect();
    if visible.is_empty() {
        console.line(Tone::Plain, "  (empty or builtins only)");
    } else {
        for symbol in visible {
            console.line(Tone::Plain, &format!("  {}: {}", symbol.name, symbol.value));
        }
    }
    console.line(Tone::Plain, &"-".repeat(40));
}
