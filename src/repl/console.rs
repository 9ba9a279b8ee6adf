//! Console output
//!
//! Everything the REPL shows goes through one [`Console`]. The interpreter's
//! `print` writes to the same sink through a [`SharedWriter`], so program
//! output and REPL messages interleave in order.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use owo_colors::{OwoColorize, Style};
use tracing::warn;

/// Visual role of a line of output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Banner,
    Heading,
    Success,
    Notice,
    Error,
    Label,
    Value,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Tone::Plain => Style::new(),
            Tone::Banner => Style::new().green().bold(),
            Tone::Heading => Style::new().magenta().bold(),
            Tone::Success => Style::new().green(),
            Tone::Notice => Style::new().yellow(),
            Tone::Error => Style::new().red(),
            Tone::Label => Style::new().yellow(),
            Tone::Value => Style::new().cyan(),
        }
    }
}

/// Cloneable handle to a single output sink
#[derive(Clone)]
pub struct SharedWriter(Rc<RefCell<Box<dyn Write>>>);

impl SharedWriter {
    pub fn new(inner: Box<dyn Write>) -> Self {
        Self(Rc::new(RefCell::new(inner)))
    }
}

impl fmt::Debug for SharedWriter {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str("SharedWriter")
    }
}

impl Write for SharedWriter {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.borrow_mut().flush()
    }
}

#[derive(Debug, Clone)]
pub struct Console {
    out: SharedWriter,
    colors: bool,
}

impl Console {
    pub fn new(
        out: Box<dyn Write>,
        colors: bool,
    ) -> Self {
        Self {
            out: SharedWriter::new(out),
            colors,
        }
    }

    /// Console on stdout
    pub fn stdout(colors: bool) -> Self {
        Self::new(Box::new(io::stdout()), colors)
    }

    /// Another handle to the same sink, for program output
    pub fn writer(&self) -> SharedWriter {
        self.out.clone()
    }

    /// Apply `tone` to `text` when colors are on
    pub fn paint(
        &self,
        tone: Tone,
        text: &str,
    ) -> String {
        if self.colors && tone != Tone::Plain {
            text.style(tone.style()).to_string()
        } else {
            text.to_string()
        }
    }

    /// Write one line
    pub fn line(
        &self,
        tone: Tone,
        text: &str,
    ) {
        let painted = self.paint(tone, text);
        self.raw(&format!("{}\n", painted));
    }

    /// `label` and `value` on one line, styled separately
    pub fn pair(
        &self,
        label: &str,
        value: &str,
    ) {
        let line = format!("{}{}\n", self.paint(Tone::Label, label), self.paint(Tone::Value, value));
        self.raw(&line);
    }

    pub fn blank(&self) {
        self.raw("\n");
    }

    /// Write text as is
    pub fn raw(
        &self,
        text: &str,
    ) {
        let mut out = self.out.clone();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            warn!(error = %e, "writing console output failed");
        }
    }
}
