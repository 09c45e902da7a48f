//! Render a captured terminal byte stream as an SGR-escaped grid snapshot.
//!
//! Reads raw bytes (e.g. a `script` capture or PTY recording) from stdin,
//! feeds them through the engine, and prints the final screen. Optional
//! arguments set the grid size: `weft-dump [cols] [rows]`.

use std::io::{self, Read};

use weft_core::Screen;

fn main() -> io::Result<()> {
    let mut args = std::env::args().skip(1);
    let cols = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(80);
    let rows = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(25);

    let mut bytes = Vec::new();
    io::stdin().read_to_end(&mut bytes)?;

    let mut screen = Screen::new(cols, rows);
    screen.feed(&bytes);
    print!("{}", screen.grid().render());
    Ok(())
}
