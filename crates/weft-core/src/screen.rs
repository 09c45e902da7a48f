//! Screen: the action sink that turns parser events into grid mutations.
//!
//! [`Screen`] owns the grid, the current SGR style, the escape parser, and
//! the streaming UTF-8 decoder, so the visible state after [`Screen::feed`]
//! is a pure function of the byte stream — independent of how the host
//! chunks its reads. Unsupported sequences are logged and ignored;
//! rendering is always best-effort.

use std::mem;

use crate::cell::Style;
use crate::grid::Grid;
use crate::parser::{Event, Parser, Utf8Decoder};

/// Logical screen state driven by a terminal byte stream.
#[derive(Debug)]
pub struct Screen {
    grid: Grid,
    style: Style,
    parser: Parser,
    decoder: Utf8Decoder,
    /// Scratch event queue, reused across bytes to avoid reallocation.
    events: Vec<Event>,
}

impl Screen {
    /// Create a screen with the standard default palette entries.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_palette(width, height, crate::cell::DEFAULT_FG, crate::cell::DEFAULT_BG)
    }

    /// Create a screen whose SGR reset state uses the given palette indices.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn with_palette(width: usize, height: usize, default_fg: u8, default_bg: u8) -> Self {
        Self {
            grid: Grid::new(width, height),
            style: Style::new(default_fg, default_bg),
            parser: Parser::new(),
            decoder: Utf8Decoder::new(),
            events: Vec::new(),
        }
    }

    /// The grid behind the screen.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The current SGR style applied to incoming printables.
    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Feed a chunk of bytes from the child process.
    pub fn feed(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.feed_byte(byte);
        }
    }

    /// Feed a single byte from the child process.
    pub fn feed_byte(&mut self, byte: u8) {
        for rune in self.decoder.push(byte) {
            self.advance(rune);
        }
    }

    /// Resize the screen, preserving content and cursor (no reflow).
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.grid.resize(width, height);
    }

    /// Stamp one printable rune through the current style.
    pub fn put(&mut self, rune: char) {
        self.grid.put(self.style.cell(rune));
    }

    fn advance(&mut self, rune: char) {
        let mut events = mem::take(&mut self.events);
        if !self.parser.consume(rune, &mut events) {
            self.put(rune);
        }
        for event in events.drain(..) {
            self.apply(event);
        }
        self.events = events;
    }

    fn apply(&mut self, event: Event) {
        match event {
            Event::Control(c) => match c {
                0x0d => self.grid.carriage_return(),
                0x0a => self.grid.line_feed(),
                0x09 => self.grid.tab(self.style.cell(' ')),
                other => {
                    tracing::debug!(control = other, "ignored control");
                }
            },
            Event::Csi { command, args } => {
                if command == "m" {
                    self.style.apply_sgr(&args);
                } else {
                    tracing::debug!(%command, ?args, "ignored CSI sequence");
                }
            }
            Event::Escape(command) => {
                tracing::debug!(%command, "ignored ESC sequence");
            }
            Event::Dcs {
                command,
                args,
                payload,
            } => {
                tracing::debug!(%command, ?args, payload_len = payload.len(), "ignored DCS");
            }
            Event::Osc(payload) => {
                tracing::debug!(%payload, "ignored OSC string");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Attrs;

    #[test]
    fn plain_text_lands_at_origin() {
        let mut screen = Screen::new(10, 3);
        screen.feed(b"hi");
        assert_eq!(screen.grid().cell(0, 0).map(|c| c.rune), Some('h'));
        assert_eq!(screen.grid().cell(1, 0).map(|c| c.rune), Some('i'));
        assert_eq!(screen.grid().cursor(), (2, 0));
    }

    #[test]
    fn lf_advances_without_returning_carriage() {
        // On a UNIX PTY the line discipline emits CR LF; a bare LF only
        // moves down.
        let mut screen = Screen::new(10, 3);
        screen.feed(b"hi\n");
        assert_eq!(screen.grid().cursor(), (2, 1));
        let mut screen = Screen::new(10, 3);
        screen.feed(b"hi\r\n");
        assert_eq!(screen.grid().cursor(), (0, 1));
    }

    #[test]
    fn sgr_styles_following_text() {
        let mut screen = Screen::new(10, 2);
        screen.feed(b"\x1b[31;1mA\x1b[0mB");
        let a = screen.grid().cell(0, 0).unwrap();
        assert_eq!(a.fg, 1);
        assert!(a.attrs.contains(Attrs::BOLD));
        let b = screen.grid().cell(1, 0).unwrap();
        assert_eq!(b.fg, crate::cell::DEFAULT_FG);
        assert_eq!(b.attrs, Attrs::empty());
    }

    #[test]
    fn bare_sgr_resets_style() {
        let mut screen = Screen::new(10, 2);
        screen.feed(b"\x1b[7mX\x1b[mY");
        assert!(screen.grid().cell(0, 0).unwrap().attrs.contains(Attrs::INVERSE));
        assert_eq!(screen.grid().cell(1, 0).unwrap().attrs, Attrs::empty());
    }

    #[test]
    fn indexed_color_text() {
        let mut screen = Screen::new(10, 2);
        screen.feed(b"\x1b[38;5;200mX");
        assert_eq!(screen.grid().cell(0, 0).unwrap().fg, 200);
    }

    #[test]
    fn unknown_csi_leaves_grid_untouched() {
        let mut screen = Screen::new(10, 3);
        screen.feed(b"\x1b[?1;2;3h");
        assert_eq!(screen.grid().cursor(), (0, 0));
        assert_eq!(screen.grid().cell(0, 0), Some(crate::cell::Cell::default()));
    }

    #[test]
    fn tab_uses_current_style() {
        let mut screen = Screen::new(20, 2);
        screen.feed(b"\x1b[41m\t");
        assert_eq!(screen.grid().cursor(), (8, 0));
        assert_eq!(screen.grid().cell(0, 0).unwrap().bg, 1);
    }

    #[test]
    fn ill_formed_utf8_renders_replacement() {
        let mut screen = Screen::new(10, 2);
        screen.feed(&[0xff, b'a']);
        assert_eq!(screen.grid().cell(0, 0).map(|c| c.rune), Some('\u{FFFD}'));
        assert_eq!(screen.grid().cell(1, 0).map(|c| c.rune), Some('a'));
    }

    #[test]
    fn unicode_text_is_stamped() {
        let mut screen = Screen::new(10, 2);
        screen.feed("héllo".as_bytes());
        assert_eq!(screen.grid().cell(1, 0).map(|c| c.rune), Some('é'));
        assert_eq!(screen.grid().cursor(), (5, 0));
    }

    #[test]
    fn custom_palette_defaults_apply_on_reset() {
        let mut screen = Screen::with_palette(10, 2, 15, 8);
        screen.feed(b"\x1b[31m\x1b[39mZ");
        assert_eq!(screen.grid().cell(0, 0).unwrap().fg, 15);
        assert_eq!(screen.grid().cell(0, 0).unwrap().bg, 8);
    }

    #[test]
    fn scroll_at_bottom_discards_top_line() {
        let mut screen = Screen::new(5, 2);
        screen.feed(b"a\r\nb\r\nc");
        assert_eq!(screen.grid().row_text(0), "b    ");
        assert_eq!(screen.grid().row_text(1), "c    ");
        assert_eq!(screen.grid().cursor(), (1, 1));
    }
}
