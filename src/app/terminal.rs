//! Terminal setup: logging, spinner eligibility and cursor visibility.

use std::io::{self, Write};

const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";

pub(crate) fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

pub(crate) fn should_use_spinner(stderr_is_terminal: bool, mute: bool, dumb_terminal: bool) -> bool {
    stderr_is_terminal && !mute && !dumb_terminal
}

/// Logs go to stderr so they never interleave with the progress board on stdout.
pub(crate) fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// Hides the terminal cursor until dropped.
#[derive(Debug)]
pub(crate) struct CursorGuard<W: Write = io::Stdout> {
    out: W,
}

impl CursorGuard {
    pub(crate) fn hide() -> Self {
        Self::hide_on(io::stdout())
    }
}

impl<W: Write> CursorGuard<W> {
    pub(crate) fn hide_on(mut out: W) -> Self {
        let _ = out.write_all(HIDE_CURSOR.as_bytes()).and_then(|()| out.flush());
        Self { out }
    }
}

impl<W: Write> Drop for CursorGuard<W> {
    fn drop(&mut self) {
        let _ = self
            .out
            .write_all(SHOW_CURSOR.as_bytes())
            .and_then(|()| self.out.flush());
    }
}
