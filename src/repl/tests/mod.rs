//! REPL unit tests


use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use tempfile::TempDir;

use crate::repl::{Console, Evaluator, Session};
use crate::tokenizer::TokenLog;

/// Output sink that keeps everything written to it
#[derive(Clone, Default)]
pub struct Captured(Rc<RefCell<Vec<u8>>>);

impl Captured {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for Captured {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Session writing into `dir`, uncolored output captured
pub fn test_session(dir: &TempDir) -> (Session<Evaluator>, Captured) {
    let captured = Captured::default();
    let console = Console::new(Box::new(captured.clone()), false);
    let evaluator = Evaluator::with_output(Box::new(console.writer()));
    let token_log = TokenLog::new(dir.path().join("tokens.txt"), dir.path().join("error_tokens.txt"));
    let session = Session::new(evaluator, console, dir.path().join("history.txt"), token_log);
    (session, captured)
}
