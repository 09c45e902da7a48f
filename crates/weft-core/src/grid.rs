//! Terminal grid: the mutable cell matrix behind the visible screen.
//!
//! Rows are stored as individually-sized vectors of [`Cell`]s: a row shorter
//! than the grid width is implicitly blank on the right, and rows grow lazily
//! as cells are stamped. The cursor column may equal the width — the
//! "pending wrap" position — in which case the next printable wraps to the
//! start of the following line before it is stamped.

use crate::cell::Cell;

/// 2D terminal cell grid with cursor.
///
/// Invariants, maintained by every operation:
/// - `width > 0`, `height > 0`, exactly `height` rows;
/// - every row length is at most `width`;
/// - `x <= width` (equality means pending wrap) and `y < height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    width: usize,
    height: usize,
    x: usize,
    y: usize,
}

impl Grid {
    /// Create a grid of blank cells with the cursor at the origin.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be > 0");
        Self {
            rows: vec![Vec::new(); height],
            width,
            height,
            x: 0,
            y: 0,
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cursor position `(x, y)`; `x == width` marks pending wrap.
    #[must_use]
    pub fn cursor(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// The cell at `(x, y)`, with short rows reading as blanks.
    ///
    /// Returns `None` outside the grid bounds.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.rows[y].get(x).copied().unwrap_or_default())
    }

    /// Number of cells actually stored in one row; cells beyond this are
    /// implicitly blank. Always at most [`width`](Self::width).
    #[must_use]
    pub fn row_len(&self, y: usize) -> usize {
        self.rows[y].len()
    }

    /// The text content of one row, padded with spaces to the grid width.
    #[must_use]
    pub fn row_text(&self, y: usize) -> String {
        let mut text: String = self.rows[y].iter().map(|cell| cell.rune).collect();
        while text.chars().count() < self.width {
            text.push(' ');
        }
        text
    }

    /// Resize to `width x height`, preserving data and cursor position.
    ///
    /// A height change inserts or discards rows at the TOP, shifting the
    /// cursor with the content; after a large shrink the cursor row is
    /// clamped back into the valid band. A width change truncates long rows
    /// (no reflow of soft-wrapped content) and clamps the cursor column.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn resize(&mut self, width: usize, height: usize) {
        assert!(width > 0 && height > 0, "grid dimensions must be > 0");
        if width == self.width && height == self.height {
            return;
        }
        if height > self.height {
            let grown = height - self.height;
            self.rows.splice(0..0, (0..grown).map(|_| Vec::new()));
            self.y += grown;
        } else if height < self.height {
            let shrunk = self.height - height;
            self.rows.drain(0..shrunk);
            self.y = self.y.saturating_sub(shrunk);
        }
        self.height = height;
        self.y = self.y.min(self.height - 1);

        for row in &mut self.rows {
            row.truncate(width);
        }
        self.x = self.x.min(width);
        self.width = width;
    }

    /// Stamp one cell at the cursor, advancing the cursor column.
    ///
    /// A cursor parked at the pending-wrap position first performs an
    /// implicit CR + LF, so the cell lands at the start of the next line.
    pub fn put(&mut self, cell: Cell) {
        if self.x == self.width {
            self.carriage_return();
            self.line_feed();
        }
        let row = &mut self.rows[self.y];
        while row.len() <= self.x {
            row.push(Cell::default());
        }
        row[self.x] = cell;
        self.x += 1;
    }

    /// Move the cursor to column zero.
    pub fn carriage_return(&mut self) {
        self.x = 0;
    }

    /// Advance the cursor one row, scrolling when already on the last one.
    pub fn line_feed(&mut self) {
        if self.y + 1 == self.height {
            self.shift_up();
        } else {
            self.y += 1;
        }
        self.fix_width();
    }

    /// Scroll the content up one row: the top row is discarded and a blank
    /// row appears at the bottom.
    pub fn shift_up(&mut self) {
        self.rows.remove(0);
        self.rows.push(Vec::new());
    }

    /// Stamp `fill` until the cursor column is a multiple of 8.
    ///
    /// At least one cell is always written, even on an aligned column.
    pub fn tab(&mut self, fill: Cell) {
        loop {
            self.put(fill);
            if self.x % 8 == 0 {
                break;
            }
        }
    }

    /// Move the cursor, clamping into the valid band (`x` may sit at the
    /// pending-wrap column).
    pub fn move_to(&mut self, x: usize, y: usize) {
        self.y = y.min(self.height - 1);
        self.x = x.min(self.width);
        self.fix_width();
    }

    /// Render the grid as text with SGR escapes, one line per row.
    ///
    /// Debug aid only; hosts typically `eprintln!` the result.
    #[must_use]
    pub fn render(&self) -> String {
        use std::fmt::Write as _;

        let mut out = String::new();
        for row in &self.rows {
            for cell in row {
                let (fg, bg) = if cell.attrs.contains(crate::cell::Attrs::INVERSE) {
                    (cell.bg, cell.fg)
                } else {
                    (cell.fg, cell.bg)
                };
                let _ = write!(out, "\x1b[38;5;{fg}m\x1b[48;5;{bg}m");
                if cell.attrs.contains(crate::cell::Attrs::BOLD) {
                    out.push_str("\x1b[1m");
                }
                if cell.attrs.contains(crate::cell::Attrs::ITALIC) {
                    out.push_str("\x1b[3m");
                }
                if cell.attrs.contains(crate::cell::Attrs::UNDERLINE) {
                    out.push_str("\x1b[4m");
                }
                out.push(if cell.rune.is_control() { ' ' } else { cell.rune });
                out.push_str("\x1b[0m");
            }
            out.push('\n');
        }
        out
    }

    /// Ensure the cursor row has a cell under the cursor column.
    fn fix_width(&mut self) {
        let row = &mut self.rows[self.y];
        if row.len() <= self.x {
            row.resize((self.x + 1).min(self.width), Cell::default());
        }
    }
}
