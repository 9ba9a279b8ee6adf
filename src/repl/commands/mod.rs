//! REPL Command Handler
//!
//! Single-word commands typed at the prompt. Matching is case-insensitive on
//! the trimmed input; anything that is not in [`COMMANDS`] is code.

use super::backend_trait::REPLBackend;
use super::console::Tone;
use super::session::Session;
use crate::tokenizer::{TokenLogContents, TokenLogKind};

/// A REPL command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    History,
    Clear,
    Tokens,
    ErrorTokens,
    Env,
    Stats,
    Debug,
    Exit,
}

/// Dispatch table: typed name, command, help text
pub const COMMANDS: &[(&str, Command, &str)] = &[
    ("help", Command::Help, "Show this help menu"),
    ("history", Command::History, "Show command history"),
    ("clear", Command::Clear, "Clear the environment"),
    ("tokens", Command::Tokens, "Show valid tokens"),
    ("error_tokens", Command::ErrorTokens, "Show error tokens"),
    ("env", Command::Env, "Show environment variables"),
    ("stats", Command::Stats, "Display usage statistics"),
    ("debug", Command::Debug, "Step-by-step code execution"),
    ("exit()", Command::Exit, "Exit the REPL"),
];

impl Command {
    /// Look up the command `input` names, if any
    pub fn parse(input: &str) -> Option<Command> {
        let wanted = input.trim().to_lowercase();
        COMMANDS
            .iter()
            .find(|(name, _, _)| *name == wanted)
            .map(|(_, command, _)| *command)
    }

    pub fn name(self) -> &'static str {
        COMMANDS
            .iter()
            .find(|(_, command, _)| *command == self)
            .map(|(name, _, _)| *name)
            .unwrap_or("")
    }
}

/// Command result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// Continue to next input
    Continue,
    /// Switch to step-through debug mode
    EnterDebug,
    /// Exit the REPL
    Exit,
}

/// Command handler for REPL
pub struct CommandHandler<'a, B: REPLBackend> {
    session: &'a mut Session<B>,
}

impl<'a, B: REPLBackend> CommandHandler<'a, B> {
    /// Create a new command handler
    pub fn new(session: &'a mut Session<B>) -> Self {
        Self { session }
    }

    /// Handle a command
    pub fn handle(
        &mut self,
        command: Command,
    ) -> CommandResult {
        tracing::debug!(command = command.name(), "dispatching command");
        match command {
            Command::Help => self.print_help(),
            Command::History => self.print_history(),
            Command::Clear => {
                self.session.backend_mut().clear();
                self.session.console().line(Tone::Notice, "🧹 Environment cleared.");
            }
            Command::Tokens => self.print_tokens(TokenLogKind::Success),
            Command::ErrorTokens => self.print_tokens(TokenLogKind::Error),
            Command::Env => self.print_environment(),
            Command::Stats => self.print_stats(),
            Command::Debug => return CommandResult::EnterDebug,
            Command::Exit => {
                self.session.save_history();
                self.session.console().line(Tone::Value, "👋 Goodbye!");
                return CommandResult::Exit;
            }
        }
        CommandResult::Continue
    }

    /// Print help message
    fn print_help(&self) {
        let console = self.session.console();
        console.blank();
        console.line(Tone::Heading, "📘 Available Commands:");
        console.line(Tone::Heading, &"─".repeat(30));
        for (name, _, description) in COMMANDS {
            console.line(Tone::Value, &format!("🔹 {:<12} → {}", name, description));
        }
        console.blank();
    }

    fn print_history(&self) {
        let console = self.session.console();
        let entries = self.session.history().entries();
        if entries.is_empty() {
            console.line(Tone::Notice, "No commands in history yet.");
            return;
        }
        console.line(Tone::Heading, "🕓 Command History:");
        for (idx, entry) in entries.iter().enumerate() {
            console.raw(&format!("{}{}\n", console.paint(Tone::Label, &format!("{}: ", idx + 1)), entry));
        }
    }

    fn print_tokens(
        &self,
        kind: TokenLogKind,
    ) {
        let console = self.session.console();
        let path = self.session.token_log().path(kind).display().to_string();
        match self.session.token_log().read(kind) {
            Ok(TokenLogContents::Missing) => {
                console.line(Tone::Error, &format!("No tokens found in {}.", path));
            }
            Ok(TokenLogContents::Lines(lines)) => {
                console.line(Tone::Heading, &format!("📦 Tokens in {}:", path));
                for line in lines {
                    console.line(Tone::Value, &line);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "reading token log failed");
                console.line(Tone::Error, &format!("❌ Error reading tokens: {}", e));
            }
        }
    }

    fn print_environment(&self) {
        let console = self.session.console();
        let symbols = self.session.backend().get_symbols();
        if symbols.is_empty() {
            console.line(Tone::Notice, "Environment is empty.");
            return;
        }
        console.line(Tone::Heading, "🌍 Current Environment:");
        for symbol in symbols.iter().filter(|s| !s.is_dunder()) {
            console.pair(&format!("{}: ", symbol.name), &symbol.value);
        }
    }

    fn print_stats(&self) {
        let console = self.session.console();
        let stats = self.session.backend().stats();
        console.blank();
        console.line(Tone::Heading, "📊 REPL Stats:");
        console.line(Tone::Heading, &"─".repeat(14));
        console.line(Tone::Label, &format!("• Commands Executed: {}", stats.eval_count));
        console.line(Tone::Label, &format!("• History Entries : {}", self.session.history().len()));
        console.line(Tone::Label, &format!("• Errors Raised   : {}", stats.error_count));
        console.line(Tone::Label, &format!("• Evaluation Time : {:.2?}", stats.total_time));
    }
}
