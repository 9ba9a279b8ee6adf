//! Shared fixtures

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use snippet_repl::repl::{Console, LineREPL, LineREPLConfig, ScriptedReader};
use snippet_repl::util::config::ReplConfig;
use snippet_repl::build_session;
use tempfile::TempDir;

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

/// Config keeping every file inside `dir`
pub fn config_in(dir: &TempDir) -> ReplConfig {
    ReplConfig {
        colors: false,
        history_file: dir.path().join("repl_history.txt"),
        tokens_file: dir.path().join("tokens.txt"),
        error_tokens_file: dir.path().join("error_tokens.txt"),
        ..ReplConfig::default()
    }
}

/// Run a scripted session over `lines`, returning everything printed
pub fn run_script(
    dir: &TempDir,
    lines: &[&str],
) -> String {
    let captured = Captured::default();
    let console = Console::new(Box::new(captured.clone()), false);
    let session = build_session(&config_in(dir), console);
    let reader = ScriptedReader::from_lines(lines.iter().copied());
    LineREPL::new(session, reader, LineREPLConfig::default())
        .run()
        .unwrap();
    captured.text()
}
