//! Terminal output shared by status lines and the progress board.
//!
//! All user-facing text goes through one [`Console`] so that status messages
//! and board redraws are serialized on the same writer, and so that `--mute`
//! silences everything in one place.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Cloneable handle to the run's output writer.
#[derive(Clone)]
pub struct Console {
    sink: Sink,
    silent: bool,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("silent", &self.silent)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Console writing to the process stdout.
    #[must_use]
    pub fn stdout(silent: bool) -> Self {
        Self::with_writer(io::stdout(), silent)
    }

    /// Console writing to an arbitrary writer (used by tests and embedders).
    #[must_use]
    pub fn with_writer(writer: impl Write + Send + 'static, silent: bool) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
            silent,
        }
    }

    /// Whether status output is suppressed.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Prints one status line unless the console is silent.
    pub fn status(&self, message: impl Display) {
        if self.silent {
            return;
        }
        self.write_raw(&format!("{message}\n"));
    }

    /// Writes raw text (escape sequences included) and flushes.
    ///
    /// Write failures are logged and dropped: a closed stdout must not abort
    /// downloads already in flight.
    pub(crate) fn write_raw(&self, text: &str) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = sink.write_all(text.as_bytes()).and_then(|()| sink.flush()) {
            debug!(error = %e, "console write failed");
        }
    }
}

/// In-memory writer whose contents can be read back after the run.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything written so far, lossily decoded as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
