//! Multi-line live progress board.
//!
//! The board keeps an ordered list of named entries (insertion order is display
//! order) and redraws all of them in place on every visible update. Redrawing in
//! place works by moving the cursor up over the lines printed by the previous
//! render, so nothing else may write to the terminal between two renders.
//!
//! Entry mutation and the printed-line bookkeeping share one mutex, so
//! concurrent downloads can increment their entries from any task or thread.
//!
//! # Example
//!
//! ```
//! use wallhaven_core::output::{CaptureBuffer, Console};
//! use wallhaven_core::progress::ProgressBoard;
//!
//! let buffer = CaptureBuffer::new();
//! let board = ProgressBoard::new(Console::with_writer(buffer.clone(), false));
//! let entry = board.register("pkgkkp.png", 40);
//! entry.increment(12);
//! assert!(buffer.contents().contains("pkgkkp.png - |############............................| 30%"));
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::output::Console;

/// Width of the bar interior in characters.
pub const BAR_WIDTH: usize = 40;

const FILL: char = '#';
const EMPTY: char = '.';

/// One named counter rendered as one bar line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEntry {
    /// Label shown before the bar.
    pub name: String,
    /// Amount of progress that fills the bar.
    pub total: u64,
    /// Progress so far; may exceed `total`, the display clamps.
    pub current: u64,
}

impl ProgressEntry {
    /// Formats `<name> - |<hashes><dots>| <pct>%`.
    #[must_use]
    pub fn render_line(&self) -> String {
        format!(
            "{} - |{}",
            self.name,
            render_bar(self.current, self.total, BAR_WIDTH)
        )
    }
}

/// Formats the bar interior, closing pipe and percentage for `current/total`.
///
/// Both the fill and the percentage are floored and clamped to 100%. A zero
/// total renders as complete.
#[must_use]
pub fn render_bar(current: u64, total: u64, width: usize) -> String {
    let (filled, percentage) = if total == 0 {
        (width, 100)
    } else {
        let current = u128::from(current.min(total));
        let total = u128::from(total);
        let width_wide = width as u128;
        #[allow(clippy::cast_possible_truncation)]
        let filled = (current * width_wide / total) as usize;
        (filled, current * 100 / total)
    };

    let mut bar = String::with_capacity(width + 8);
    bar.extend(std::iter::repeat_n(FILL, filled));
    bar.extend(std::iter::repeat_n(EMPTY, width - filled));
    bar.push_str(&format!("| {percentage}%"));
    bar
}

#[derive(Debug, Default)]
struct BoardState {
    entries: Vec<ProgressEntry>,
    printed_lines: usize,
    /// Bumped on every clear so handles from a previous page become inert.
    generation: u64,
}

/// Shared registry of progress entries for one run.
///
/// Create one per run and pass it by reference to every download of a page;
/// call [`clear`](Self::clear) between pages.
#[derive(Debug)]
pub struct ProgressBoard {
    state: Mutex<BoardState>,
    console: Console,
}

impl ProgressBoard {
    /// Creates an empty board that renders through `console`.
    #[must_use]
    pub fn new(console: Console) -> Self {
        Self {
            state: Mutex::new(BoardState::default()),
            console,
        }
    }

    /// Appends a new entry with `current = 0` and returns its handle.
    ///
    /// Registration does not render; the first increment does.
    pub fn register(&self, name: impl Into<String>, total: u64) -> ProgressHandle<'_> {
        let mut state = self.lock();
        state.entries.push(ProgressEntry {
            name: name.into(),
            total,
            current: 0,
        });
        ProgressHandle {
            board: self,
            index: state.entries.len() - 1,
            generation: state.generation,
        }
    }

    /// Redraws every entry in place.
    pub fn render(&self) {
        let mut state = self.lock();
        self.render_locked(&mut state);
    }

    /// Drops all entries and forgets previously printed lines, so the next
    /// render starts a fresh block below the old one.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.printed_lines = 0;
        state.generation = state.generation.wrapping_add(1);
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the board has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Lines written by the last render (the cursor-up distance of the next one).
    #[must_use]
    pub fn printed_lines(&self) -> usize {
        self.lock().printed_lines
    }

    /// Copy of the current entries in display order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ProgressEntry> {
        self.lock().entries.clone()
    }

    fn increment(&self, index: usize, generation: u64, amount: u64, display: bool) {
        let mut state = self.lock();
        if state.generation != generation {
            return;
        }
        let Some(entry) = state.entries.get_mut(index) else {
            return;
        };
        entry.current = entry.current.saturating_add(amount);
        if display {
            self.render_locked(&mut state);
        }
    }

    fn render_locked(&self, state: &mut BoardState) {
        let mut frame = String::new();
        if state.printed_lines > 0 {
            // CSI n F: cursor to the start of the line n lines up.
            frame.push_str(&format!("\x1b[{}F", state.printed_lines));
        }
        for entry in &state.entries {
            frame.push_str(&entry.render_line());
            frame.push('\n');
        }
        self.console.write_raw(&frame);
        state.printed_lines = state.entries.len();
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to one registered entry.
///
/// Becomes a no-op once the board is cleared.
#[derive(Debug)]
pub struct ProgressHandle<'a> {
    board: &'a ProgressBoard,
    index: usize,
    generation: u64,
}

impl ProgressHandle<'_> {
    /// Adds `amount` and redraws the board.
    pub fn increment(&self, amount: u64) {
        self.increment_with(amount, true);
    }

    /// Adds `amount`, redrawing only when `display` is set.
    pub fn increment_with(&self, amount: u64, display: bool) {
        self.board
            .increment(self.index, self.generation, amount, display);
    }
}
