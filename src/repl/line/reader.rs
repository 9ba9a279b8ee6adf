//! Line sources
//!
//! The REPL reads through [`LineReader`] so the same loop drives both the
//! interactive terminal and scripted sessions.

use std::collections::VecDeque;

use rustyline::config::Config;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, EditMode, Editor};

use super::completer::REPLCompleter;
use crate::repl::error::ReplError;

/// What a single read produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Ctrl-C
    Interrupted,
    /// Ctrl-D or end of input
    Eof,
}

pub trait LineReader {
    /// Read one line, without its terminator
    fn read_line(
        &mut self,
        prompt: &str,
    ) -> Result<ReadOutcome, ReplError>;

    /// Remember a submitted block for in-session recall
    fn add_history_entry(
        &mut self,
        _entry: &str,
    ) {
    }

    /// Replace the names offered for completion
    fn set_completions(
        &mut self,
        _names: Vec<String>,
    ) {
    }
}

/// Interactive terminal input
pub struct RustylineReader {
    editor: Editor<REPLCompleter, DefaultHistory>,
}

impl RustylineReader {
    pub fn new(vi_mode: bool) -> Result<Self, ReplError> {
        let config = Config::builder()
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .edit_mode(if vi_mode { EditMode::Vi } else { EditMode::Emacs })
            .build();
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(REPLCompleter::new()));
        Ok(Self { editor })
    }
}

impl LineReader for RustylineReader {
    fn read_line(
        &mut self,
        prompt: &str,
    ) -> Result<ReadOutcome, ReplError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(e) => Err(e.into()),
        }
    }

    fn add_history_entry(
        &mut self,
        entry: &str,
    ) {
        // in-memory only; the session history file has its own format
        let _ = self.editor.add_history_entry(entry);
    }

    fn set_completions(
        &mut self,
        names: Vec<String>,
    ) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.set_symbols(names);
        }
    }
}

/// One scripted input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedInput {
    Line(String),
    Interrupt,
}

/// Pre-recorded input; reports EOF once exhausted
#[derive(Debug, Default)]
pub struct ScriptedReader {
    inputs: VecDeque<ScriptedInput>,
    prompts: Vec<String>,
}

impl ScriptedReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reader over the lines of `script`
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut reader = Self::new();
        for line in lines {
            reader.push_line(line);
        }
        reader
    }

    pub fn push_line(
        &mut self,
        line: impl Into<String>,
    ) -> &mut Self {
        self.inputs.push_back(ScriptedInput::Line(line.into()));
        self
    }

    pub fn push_interrupt(&mut self) -> &mut Self {
        self.inputs.push_back(ScriptedInput::Interrupt);
        self
    }

    /// Prompts shown so far, in order
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl LineReader for ScriptedReader {
    fn read_line(
        &mut self,
        prompt: &str,
    ) -> Result<ReadOutcome, ReplError> {
        self.prompts.push(prompt.to_string());
        Ok(match self.inputs.pop_front() {
            Some(ScriptedInput::Line(line)) => ReadOutcome::Line(line),
            Some(ScriptedInput::Interrupt) => ReadOutcome::Interrupted,
            None => ReadOutcome::Eof,
        })
    }
}
