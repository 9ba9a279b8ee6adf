//! Script errors
//!
//! Every failure raised while parsing or executing a snippet is a [`ScriptError`].
//! The REPL never inspects the kind; it only formats the error for display.

use std::fmt;

/// Category of a script error, named after the exception it mirrors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SyntaxError,
    NameError,
    TypeError,
    ValueError,
    ZeroDivisionError,
    IndexError,
    KeyError,
    OverflowError,
    RecursionError,
    AttributeError,
    OSError,
}

impl fmt::Display for ErrorKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Error raised by the runtime
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ScriptError {
    /// Error category
    pub kind: ErrorKind,
    /// Human readable message
    pub message: String,
    /// Source line, when known
    pub line: Option<usize>,
}

impl ScriptError {
    /// Create a new error of the given kind
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
        }
    }

    /// Attach a source line
    pub fn at_line(
        mut self,
        line: usize,
    ) -> Self {
        self.line = Some(line);
        self
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SyntaxError, message)
    }

    pub fn name(name: &str) -> Self {
        Self::new(ErrorKind::NameError, format!("name '{}' is not defined", name))
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    pub fn value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValueError, message)
    }

    pub fn zero_division(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ZeroDivisionError, message)
    }

    pub fn index(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IndexError, message)
    }

    pub fn key(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::KeyError, message)
    }

    pub fn overflow() -> Self {
        Self::new(ErrorKind::OverflowError, "integer overflow")
    }
}

/// Result alias used across the runtime
pub type ScriptResult<T> = Result<T, ScriptError>;

/// Shorthand for returning a [`ScriptError`] of the given kind
#[macro_export]
macro_rules! script_bail {
    ($kind:ident, $($arg:tt)*) => {
        return Err($crate::runtime::ScriptError::new(
            $crate::runtime::ErrorKind::$kind,
            format!($($arg)*),
        ))
    };
}
