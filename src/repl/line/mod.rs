//! Line-based REPL
//!
//! Reads blocks of lines (terminated by a blank line), dispatches commands and
//! submits everything else to the backend.

use tracing::{debug, info};

use crate::repl::backend_trait::REPLBackend;
use crate::repl::commands::{Command, CommandHandler, CommandResult};
use crate::repl::console::Tone;
use crate::repl::debug::{self, DebugExit};
use crate::repl::error::ReplError;
use crate::repl::session::Session;

mod completer;
mod reader;
pub use completer::REPLCompleter;
pub use reader::{LineReader, ReadOutcome, RustylineReader, ScriptedInput, ScriptedReader};

/// Line REPL configuration
#[derive(Debug, Clone)]
pub struct LineREPLConfig {
    /// Prompt to display
    pub prompt: String,
    /// Prompt for the second and later lines of a block
    pub continuation_prompt: String,
    /// Prompt inside debug mode
    pub debug_prompt: String,
}

impl Default for LineREPLConfig {
    fn default() -> Self {
        Self {
            prompt: ">>> ".into(),
            continuation_prompt: "... ".into(),
            debug_prompt: "→ ".into(),
        }
    }
}

/// A block read from the prompt, or why there is none
#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Code(String),
    Interrupted,
    Eof,
}

/// Line REPL
pub struct LineREPL<B: REPLBackend, R: LineReader> {
    /// Configuration
    config: LineREPLConfig,
    /// Input source
    reader: R,
    /// Backend, history and logs
    session: Session<B>,
}

impl<B: REPLBackend, R: LineReader> LineREPL<B, R> {
    /// Create a new line REPL
    pub fn new(
        session: Session<B>,
        reader: R,
        config: LineREPLConfig,
    ) -> Self {
        Self {
            config,
            reader,
            session,
        }
    }

    /// Run the REPL until `exit()` or end of input
    pub fn run(&mut self) -> Result<(), ReplError> {
        info!("starting REPL");
        self.session.print_banner();
        self.session.load_history();

        loop {
            let names = self.session.backend().complete("");
            self.reader.set_completions(names);
            match self.read_block()? {
                Block::Code(code) => {
                    if !self.dispatch(&code)? {
                        break;
                    }
                }
                Block::Interrupted => self.on_interrupt(),
                Block::Eof => {
                    self.on_eof();
                    break;
                }
            }
        }

        info!("REPL finished");
        Ok(())
    }

    /// Lines up to a blank line, joined with `\n`. A command on the first
    /// line is returned on its own.
    fn read_block(&mut self) -> Result<Block, ReplError> {
        let mut lines: Vec<String> = Vec::new();
        loop {
            let prompt = if lines.is_empty() {
                &self.config.prompt
            } else {
                &self.config.continuation_prompt
            };
            match self.reader.read_line(prompt)? {
                ReadOutcome::Line(line) => {
                    if line.trim().is_empty() {
                        break;
                    }
                    let is_command = lines.is_empty() && Command::parse(&line).is_some();
                    lines.push(line);
                    if is_command {
                        break;
                    }
                }
                ReadOutcome::Interrupted => return Ok(Block::Interrupted),
                ReadOutcome::Eof => return Ok(Block::Eof),
            }
        }
        Ok(Block::Code(lines.join("\n")))
    }

    /// Handle one block; `false` ends the session
    fn dispatch(
        &mut self,
        code: &str,
    ) -> Result<bool, ReplError> {
        if code.trim().is_empty() {
            return Ok(true);
        }
        self.reader.add_history_entry(code);

        let command = match Command::parse(code) {
            Some(command) => command,
            None => {
                debug!(lines = code.lines().count(), "submitting code");
                self.session.submit(code);
                return Ok(true);
            }
        };

        match CommandHandler::new(&mut self.session).handle(command) {
            CommandResult::Continue => Ok(true),
            CommandResult::Exit => Ok(false),
            CommandResult::EnterDebug => {
                match debug::run(&mut self.session, &mut self.reader, &self.config.debug_prompt)? {
                    DebugExit::Done => Ok(true),
                    DebugExit::Interrupted => {
                        self.on_interrupt();
                        Ok(true)
                    }
                    DebugExit::Eof => {
                        self.on_eof();
                        Ok(false)
                    }
                }
            }
        }
    }

    fn on_interrupt(&mut self) {
        info!("interrupted");
        let console = self.session.console();
        console.blank();
        console.line(Tone::Error, "⛔ KeyboardInterrupt. Type 'exit()' to quit.");
        self.session.save_history();
    }

    fn on_eof(&mut self) {
        info!("end of input");
        let console = self.session.console();
        console.blank();
        console.line(Tone::Error, "⛔ EOF received. Exiting...");
        self.session.save_history();
    }

    /// Get the session
    pub fn session(&self) -> &Session<B> {
        &self.session
    }

    /// Get the input source
    pub fn reader(&self) -> &R {
        &self.reader
    }
}
