//! Configuration
//!
//! # Lookup order
//!
//! ```text
//! 1. --config <FILE>
//! 2. ./snippet-repl.toml
//! 3. $XDG_CONFIG_HOME/snippet-repl/config.toml (or ~/.config/snippet-repl/config.toml)
//! 4. Default values
//! ```
//!
//! CLI flags are applied on top of whichever file was found.
//!
//! # Example
//!
//! ```toml
//! [repl]
//! prompt = ">>> "
//! colors = false
//! history_file = "repl_history.txt"
//!
//! [log]
//! level = "info"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::history::DEFAULT_HISTORY_FILE;
use crate::tokenizer::{DEFAULT_ERROR_TOKENS_FILE, DEFAULT_TOKENS_FILE};
use crate::util::logger::LogLevel;

#[cfg(test)]
mod tests;

/// Project-level config file, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "snippet-repl.toml";

/// Directory name under the user config directory
const APP_DIR: &str = "snippet-repl";

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// REPL settings
    #[serde(default)]
    pub repl: ReplConfig,
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

/// REPL configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReplConfig {
    /// Prompt string
    pub prompt: String,
    /// Prompt for continuation lines
    pub continuation_prompt: String,
    /// Colored output
    pub colors: bool,
    /// Use vi key bindings
    pub vi_mode: bool,
    /// History file path
    pub history_file: PathBuf,
    /// Log of tokens from input that ran
    pub tokens_file: PathBuf,
    /// Log of tokens from input that raised
    pub error_tokens_file: PathBuf,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: ">>> ".to_string(),
            continuation_prompt: "... ".to_string(),
            colors: true,
            vi_mode: false,
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            tokens_file: PathBuf::from(DEFAULT_TOKENS_FILE),
            error_tokens_file: PathBuf::from(DEFAULT_ERROR_TOKENS_FILE),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Get the user config directory
pub fn get_config_dir() -> Option<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config.is_empty() {
            return Some(PathBuf::from(xdg_config).join(APP_DIR));
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home).join(".config").join(APP_DIR));
    }

    // Windows
    if let Ok(appdata) = std::env::var("APPDATA") {
        return Some(PathBuf::from(appdata).join(APP_DIR));
    }

    None
}

/// Get the user config file path
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// Find the config file to use, if any
///
/// An explicit path must exist; the implicit locations are skipped when absent.
pub fn locate(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        return Ok(Some(path.to_path_buf()));
    }

    let project = PathBuf::from(PROJECT_CONFIG_FILE);
    if project.exists() {
        return Ok(Some(project));
    }

    Ok(get_config_path().filter(|path| path.exists()))
}

/// Parse a config file
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse config text; missing keys take their defaults
pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

/// Load configuration following the lookup order
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match locate(explicit)? {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_from(&path)
        }
        None => {
            debug!("no config file, using defaults");
            Ok(Config::default())
        }
    }
}
