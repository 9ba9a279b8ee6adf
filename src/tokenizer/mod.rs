//! Regex tokenizer
//!
//! A display-only pass over REPL input: every word and single-character
//! punctuation mark is labeled with one of five coarse classes. Execution never
//! looks at these tokens; they feed the token logs and debug mode.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

#[cfg(test)]
mod tests;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\w+\b|[\+\-\*/=<>!&|;:(){}\[\],.]").expect("token pattern is valid")
});

static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("number pattern is valid"));

static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_]\w*$").expect("identifier pattern is valid"));

/// Words classified as keywords
pub const KEYWORDS: &[&str] = &[
    "def", "class", "return", "if", "else", "for", "while", "import", "from", "as", "with",
];

/// Single characters classified as operators
pub const OPERATORS: &[&str] = &["+", "-", "*", "/", "=", "<", ">", "!", "&", "|"];

/// Token class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Keyword,
    Operator,
    Number,
    Identifier,
    Symbol,
}

impl TokenClass {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenClass::Keyword => "KEYWORD",
            TokenClass::Operator => "OPERATOR",
            TokenClass::Number => "NUMBER",
            TokenClass::Identifier => "IDENTIFIER",
            TokenClass::Symbol => "SYMBOL",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A matched substring and its class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub class: TokenClass,
}

impl fmt::Display for Token {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}: {}", self.text, self.class)
    }
}

/// Classify a single token; the first matching rule wins
pub fn classify(token: &str) -> TokenClass {
    if KEYWORDS.contains(&token) {
        TokenClass::Keyword
    } else if OPERATORS.contains(&token) {
        TokenClass::Operator
    } else if NUMBER_PATTERN.is_match(token) {
        TokenClass::Number
    } else if IDENTIFIER_PATTERN.is_match(token) {
        TokenClass::Identifier
    } else {
        TokenClass::Symbol
    }
}

/// Split `code` into classified tokens, in source order
pub fn tokenize(code: &str) -> Vec<Token> {
    let tokens: Vec<Token> = TOKEN_PATTERN
        .find_iter(code)
        .map(|m| Token {
            text: m.as_str().to_string(),
            class: classify(m.as_str()),
        })
        .collect();
    debug!(count = tokens.len(), "tokenized input");
    tokens
}

/// Default file for tokens of input that ran
pub const DEFAULT_TOKENS_FILE: &str = "tokens.txt";

/// Default file for tokens of input that raised
pub const DEFAULT_ERROR_TOKENS_FILE: &str = "error_tokens.txt";

/// Which token log a batch belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLogKind {
    /// Input that executed without error
    Success,
    /// Input that raised an error
    Error,
}

/// Token log errors
#[derive(Debug, thiserror::Error)]
pub enum TokenLogError {
    #[error("{path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of reading a token log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenLogContents {
    /// Stored lines, trimmed
    Lines(Vec<String>),
    /// The file has not been created yet
    Missing,
}

/// The two append-only token files
#[derive(Debug, Clone)]
pub struct TokenLog {
    tokens_path: PathBuf,
    error_tokens_path: PathBuf,
}

impl TokenLog {
    pub fn new(
        tokens_path: impl Into<PathBuf>,
        error_tokens_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            tokens_path: tokens_path.into(),
            error_tokens_path: error_tokens_path.into(),
        }
    }

    pub fn path(
        &self,
        kind: TokenLogKind,
    ) -> &Path {
        match kind {
            TokenLogKind::Success => &self.tokens_path,
            TokenLogKind::Error => &self.error_tokens_path,
        }
    }

    /// Append one `token: CLASS` line per token, creating the file if needed
    pub fn append(
        &self,
        kind: TokenLogKind,
        tokens: &[Token],
    ) -> Result<(), TokenLogError> {
        let path = self.path(kind);
        let write_err = |source| TokenLogError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(write_err)?;
        let mut buf = String::new();
        for token in tokens {
            buf.push_str(&token.to_string());
            buf.push('\n');
        }
        file.write_all(buf.as_bytes()).map_err(write_err)?;

        info!(path = %path.display(), count = tokens.len(), "appended tokens");
        Ok(())
    }

    /// Read back the stored lines
    pub fn read(
        &self,
        kind: TokenLogKind,
    ) -> Result<TokenLogContents, TokenLogError> {
        let path = self.path(kind);
        if !path.exists() {
            return Ok(TokenLogContents::Missing);
        }
        let content = fs::read_to_string(path).map_err(|source| TokenLogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(TokenLogContents::Lines(
            content.lines().map(|line| line.trim().to_string()).collect(),
        ))
    }
}
