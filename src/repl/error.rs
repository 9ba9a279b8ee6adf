//! REPL errors
//!
//! Only failures of the terminal itself end a session; evaluation and file
//! errors are reported inline and the loop continues.

use std::io;

use rustyline::error::ReadlineError;

#[derive(Debug, thiserror::Error)]
pub enum ReplError {
    #[error("readline error: {0}")]
    Readline(#[from] ReadlineError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
