//! Tests for the embedded runtime

mod interpreter;

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crate::runtime::Interpreter;

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

pub fn capturing_interpreter() -> (Interpreter, Captured) {
    let captured = Captured::default();
    (Interpreter::with_output(Box::new(captured.clone())), captured)
}
