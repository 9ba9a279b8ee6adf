//! REPL Completer
//!
//! Completes identifiers from the script keywords and the names the backend
//! can resolve (bindings and builtins).

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::runtime::lexer::KEYWORDS;

/// REPL Completer
pub struct REPLCompleter {
    /// Reserved words
    keywords: Vec<&'static str>,
    /// Resolvable names, refreshed by the REPL loop
    symbols: Vec<String>,
}

impl Default for REPLCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl REPLCompleter {
    /// Create a new completer
    pub fn new() -> Self {
        Self {
            keywords: KEYWORDS.to_vec(),
            symbols: Vec::new(),
        }
    }

    pub fn set_symbols(
        &mut self,
        symbols: Vec<String>,
    ) {
        self.symbols = symbols;
    }

    /// Candidates for `word`, sorted and de-duplicated
    pub fn candidates(
        &self,
        word: &str,
    ) -> Vec<Pair> {
        if word.is_empty() {
            return Vec::new();
        }

        let mut candidates = Vec::new();
        for name in &self.symbols {
            if name.starts_with(word) {
                candidates.push(Pair {
                    display: name.clone(),
                    replacement: name.clone(),
                });
            }
        }
        for kw in &self.keywords {
            if kw.starts_with(word) {
                candidates.push(Pair {
                    display: kw.to_string(),
                    replacement: kw.to_string(),
                });
            }
        }
        candidates.sort_by(|a, b| a.replacement.cmp(&b.replacement));
        candidates.dedup_by(|a, b| a.replacement == b.replacement);
        candidates
    }
}

impl Completer for REPLCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        // Get the word being completed
        let (start, word) = match line[..pos].rfind(|c: char| !c.is_alphanumeric() && c != '_') {
            Some(i) => {
                let start = i + line[i..].chars().next().map_or(1, char::len_utf8);
                (start, &line[start..pos])
            }
            None => (0, &line[..pos]),
        };
        Ok((start, self.candidates(word)))
    }
}

impl Hinter for REPLCompleter {
    type Hint = String;
}

impl Highlighter for REPLCompleter {}

impl Validator for REPLCompleter {}

impl Helper for REPLCompleter {}
