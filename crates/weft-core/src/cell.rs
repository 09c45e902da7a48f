//! Terminal cell: the fundamental unit of the grid.
//!
//! Each cell stores one Unicode scalar plus its SGR attributes: a foreground
//! and background index into the 256-color palette and an attribute bit-set.
//! [`Style`] is the cell-shaped value (minus the rune) that the screen stamps
//! onto incoming printable characters.

use bitflags::bitflags;

/// Default foreground palette index (SGR 39).
pub const DEFAULT_FG: u8 = 7;
/// Default background palette index (SGR 49).
pub const DEFAULT_BG: u8 = 0;

bitflags! {
    /// SGR text attribute flags.
    ///
    /// Maps directly to the ECMA-48 / VT100 SGR parameter values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attrs: u8 {
        const BOLD      = 1 << 0;
        const ITALIC    = 1 << 1;
        const UNDERLINE = 1 << 2;
        const INVERSE   = 1 << 3;
    }
}

/// A single cell in the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The character content. A space for empty/erased cells.
    pub rune: char,
    /// Foreground 256-color palette index.
    pub fg: u8,
    /// Background 256-color palette index.
    pub bg: u8,
    /// SGR attribute flags.
    pub attrs: Attrs,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            rune: ' ',
            fg: DEFAULT_FG,
            bg: DEFAULT_BG,
            attrs: Attrs::empty(),
        }
    }
}

impl Cell {
    /// Create a cell with the given rune and default attributes.
    #[must_use]
    pub fn new(rune: char) -> Self {
        Self {
            rune,
            ..Self::default()
        }
    }
}

/// The current SGR state: everything a cell carries except the rune.
///
/// SGR sequences mutate this; printable characters are stamped through it.
/// The reset values are configurable at construction so a host can pick its
/// own default palette entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: u8,
    pub bg: u8,
    pub attrs: Attrs,
    default_fg: u8,
    default_bg: u8,
}

impl Default for Style {
    fn default() -> Self {
        Self::new(DEFAULT_FG, DEFAULT_BG)
    }
}

impl Style {
    /// Create a style whose reset state uses the given palette indices.
    #[must_use]
    pub fn new(default_fg: u8, default_bg: u8) -> Self {
        Self {
            fg: default_fg,
            bg: default_bg,
            attrs: Attrs::empty(),
            default_fg,
            default_bg,
        }
    }

    /// Reset to the configured defaults (SGR 0).
    pub fn reset(&mut self) {
        self.fg = self.default_fg;
        self.bg = self.default_bg;
        self.attrs = Attrs::empty();
    }

    /// Stamp this style onto a rune, producing the cell to write.
    #[must_use]
    pub fn cell(&self, rune: char) -> Cell {
        Cell {
            rune,
            fg: self.fg,
            bg: self.bg,
            attrs: self.attrs,
        }
    }

    /// Apply an SGR parameter list (the CSI `m` family).
    ///
    /// An empty list is treated as a bare `ESC [ m`, which per the xterm
    /// convention resets the style. The indexed-color forms `38;5;n` and
    /// `48;5;n` are recognized when they make up the whole list; an index
    /// outside the palette falls back to the default entry.
    pub fn apply_sgr(&mut self, params: &[u16]) {
        if params.is_empty() {
            self.reset();
            return;
        }
        if params.len() == 3 && params[1] == 5 && (params[0] == 38 || params[0] == 48) {
            let idx = if params[2] < 256 {
                params[2] as u8
            } else if params[0] == 38 {
                self.default_fg
            } else {
                self.default_bg
            };
            if params[0] == 38 {
                self.fg = idx;
            } else {
                self.bg = idx;
            }
            return;
        }
        for &p in params {
            match p {
                0 => self.reset(),
                1 => self.attrs.insert(Attrs::BOLD),
                2 => self.attrs.remove(Attrs::BOLD), // faint: closest we render
                3 => self.attrs.insert(Attrs::ITALIC),
                4 | 21 => self.attrs.insert(Attrs::UNDERLINE),
                7 => self.attrs.insert(Attrs::INVERSE),
                22 => self.attrs.remove(Attrs::BOLD),
                23 => self.attrs.remove(Attrs::ITALIC),
                24 => self.attrs.remove(Attrs::UNDERLINE),
                27 => self.attrs.remove(Attrs::INVERSE),
                // blink, hidden, strikethrough and their resets: accepted, not rendered
                5 | 8 | 9 | 25 | 28 | 29 => {}
                30..=37 => self.fg = (p - 30) as u8,
                40..=47 => self.bg = (p - 40) as u8,
                90..=97 => self.fg = 8 + (p - 90) as u8,
                100..=107 => self.bg = 8 + (p - 100) as u8,
                39 => self.fg = self.default_fg,
                49 => self.bg = self.default_bg,
                other => {
                    tracing::debug!(param = other, "unsupported SGR parameter");
                }
            }
        }
    }
}
