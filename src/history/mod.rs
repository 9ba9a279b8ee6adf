//! Command history
//!
//! Flat, timestamped list of everything the user submitted as code. Persisted
//! as plain text, one entry per line; on reload entries are taken verbatim.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

#[cfg(test)]
mod tests;

/// Default history file name
pub const DEFAULT_HISTORY_FILE: &str = "repl_history.txt";

/// History persistence errors
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("{path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What `load` found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Number of entries appended
    Loaded(usize),
    /// No history file yet
    Missing,
}

#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    entries: Vec<String>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `command` with the current local time
    pub fn add(
        &mut self,
        command: &str,
    ) {
        let timestamp = Local::now().format("%H:%M:%S");
        self.entries.push(format!("[{}] {}", timestamp, command));
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite `path` with every entry, newline terminated
    pub fn save(
        &self,
        path: &Path,
    ) -> Result<(), HistoryError> {
        let mut content = self.entries.join("\n");
        content.push('\n');
        fs::write(path, content).map_err(|source| HistoryError::Save {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), entries = self.entries.len(), "history saved");
        Ok(())
    }

    /// Append the trimmed, non-blank lines of `path`
    pub fn load(
        &mut self,
        path: &Path,
    ) -> Result<LoadOutcome, HistoryError> {
        if !path.exists() {
            return Ok(LoadOutcome::Missing);
        }
        let content = fs::read_to_string(path).map_err(|source| HistoryError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        let before = self.entries.len();
        self.entries.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
        let loaded = self.entries.len() - before;
        info!(path = %path.display(), entries = loaded, "history loaded");
        Ok(LoadOutcome::Loaded(loaded))
    }
}
