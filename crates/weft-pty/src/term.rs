//! The byte pump: wiring a PTY master to the screen engine.
//!
//! [`Term`] owns one end of the conversation with the child process. The
//! surrounding event loop polls the PTY file descriptor and calls
//! [`on_readable`](Term::on_readable) / [`on_writable`](Term::on_writable)
//! when readiness fires; the windowing collaborator delivers keypresses
//! through [`key`](Term::key). The PTY is expected to be non-blocking —
//! `WouldBlock` and `Interrupted` are quietly retried on the next tick,
//! anything else is logged and survived.

use std::io::{self, Read, Write};

use weft_core::{HistoryRing, Screen, WriteQueue};

use crate::input::Keypress;

/// Size of the read buffer drained per readiness tick.
const READ_BUF_BYTES: usize = 1024;

/// Construction-time configuration for a terminal.
#[derive(Debug, Clone)]
pub struct TermConfig {
    /// Initial grid width in columns.
    pub cols: usize,
    /// Initial grid height in rows.
    pub rows: usize,
    /// Palette index restored by SGR 39 / SGR 0.
    pub default_fg: u8,
    /// Palette index restored by SGR 49 / SGR 0.
    pub default_bg: u8,
    /// Capacity of each debug history ring.
    pub history_bytes: usize,
    /// Block size of the outgoing write queue.
    pub write_block_bytes: usize,
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 25,
            default_fg: weft_core::DEFAULT_FG,
            default_bg: weft_core::DEFAULT_BG,
            history_bytes: 192,
            write_block_bytes: 1024,
        }
    }
}

impl TermConfig {
    /// Override the initial grid dimensions.
    #[must_use]
    pub fn with_size(mut self, cols: usize, rows: usize) -> Self {
        self.cols = cols;
        self.rows = rows;
        self
    }

    /// Override the default palette entries.
    #[must_use]
    pub fn with_palette(mut self, fg: u8, bg: u8) -> Self {
        self.default_fg = fg;
        self.default_bg = bg;
        self
    }

    /// Override the debug history ring capacity.
    #[must_use]
    pub fn with_history_bytes(mut self, bytes: usize) -> Self {
        self.history_bytes = bytes;
        self
    }

    /// Override the write queue block size.
    #[must_use]
    pub fn with_write_block_bytes(mut self, bytes: usize) -> Self {
        self.write_block_bytes = bytes;
        self
    }
}

/// A terminal: screen engine plus the byte plumbing around one PTY master.
#[derive(Debug)]
pub struct Term<T> {
    io: T,
    screen: Screen,
    write_queue: WriteQueue,
    read_history: HistoryRing,
    write_history: HistoryRing,
}

impl<T: Read + Write> Term<T> {
    /// Wrap a PTY master (or any byte pipe) with a fresh screen.
    ///
    /// # Panics
    ///
    /// Panics if the configured dimensions, history capacity, or block size
    /// are zero.
    #[must_use]
    pub fn new(io: T, config: TermConfig) -> Self {
        Self {
            io,
            screen: Screen::with_palette(
                config.cols,
                config.rows,
                config.default_fg,
                config.default_bg,
            ),
            write_queue: WriteQueue::new(config.write_block_bytes),
            read_history: HistoryRing::new(config.history_bytes),
            write_history: HistoryRing::new(config.history_bytes),
        }
    }

    /// The screen driven by the child's output.
    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Ring of the most recent bytes read from the child.
    #[must_use]
    pub fn read_history(&self) -> &HistoryRing {
        &self.read_history
    }

    /// Ring of the most recent bytes written to the child.
    #[must_use]
    pub fn write_history(&self) -> &HistoryRing {
        &self.write_history
    }

    /// Drain one buffer of output from the child into the screen.
    ///
    /// Called by the event loop when the PTY reports readable. Transient
    /// errors are a no-op; other errors are logged and non-fatal.
    pub fn on_readable(&mut self) {
        let mut buf = [0u8; READ_BUF_BYTES];
        match self.io.read(&mut buf) {
            Ok(0) => {
                // EOF: the child went away; the supervisor decides what next.
                tracing::debug!("PTY master reached EOF");
            }
            Ok(n) => {
                self.read_history.record(&buf[..n]);
                self.screen.feed(&buf[..n]);
            }
            Err(err) if is_transient(&err) => {}
            Err(err) => {
                tracing::warn!(error = %err, "reading from PTY master");
            }
        }
    }

    /// Attempt one write of the queue's head block toward the child.
    ///
    /// Partial writes shift only the head; transient errors are retried on
    /// the next readiness tick.
    ///
    /// # Panics
    ///
    /// Panics when called with an empty queue — the event loop must gate
    /// `POLLOUT` on [`needs_write`](Self::needs_write).
    pub fn on_writable(&mut self) {
        assert!(self.needs_write(), "on_writable called with an empty queue");
        let block = self.write_queue.peek_block();
        match self.io.write(block) {
            Ok(n) => {
                self.write_history.record(&block[..n]);
                self.write_queue.consume(n);
            }
            Err(err) if is_transient(&err) => {}
            Err(err) => {
                tracing::warn!(error = %err, "writing to PTY master");
            }
        }
    }

    /// Whether bytes are waiting for the child.
    #[must_use]
    pub fn needs_write(&self) -> bool {
        self.write_queue.has_pending()
    }

    /// Queue raw bytes for transmission to the child.
    pub fn queue(&mut self, bytes: &[u8]) {
        self.write_queue.push(bytes);
    }

    /// Translate a keypress and queue its bytes for the child.
    pub fn key(&mut self, key: &Keypress) {
        let bytes = key.encode();
        if bytes.is_empty() {
            tracing::debug!(key = ?key.key, "keypress with no encoding");
            return;
        }
        self.queue(&bytes);
    }

    /// Propagate a window resize to the screen (no reflow).
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.screen.resize(cols, rows);
    }

    /// Render the screen and both history rings for debug output.
    #[must_use]
    pub fn debug_dump(&self) -> String {
        format!(
            "=====\n{}-----\nRead:\n{}Write:\n{}=====\n",
            self.screen.grid().render(),
            self.read_history.dump(),
            self.write_history.dump(),
        )
    }
}

/// EAGAIN/EINTR-class errors: retried on the next readiness tick.
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}
