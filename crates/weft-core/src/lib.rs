#![forbid(unsafe_code)]

//! Host-agnostic terminal engine.
//!
//! `weft-core` is the platform-independent model at the heart of weft. It
//! turns the byte stream coming out of a child process into a logical
//! screen state: a cell grid with a cursor, per-cell SGR styling, scroll
//! and resize semantics.
//!
//! # Primary responsibilities
//!
//! - **Cell / Style**: character content plus SGR attributes (256-color
//!   palette indices, bold/italic/underline/inverse).
//! - **Parser**: the DEC ANSI escape state machine, emitting structured
//!   events for controls, ESC, CSI, DCS, and OSC sequences, with a
//!   streaming UTF-8 decoder in front.
//! - **Grid**: the mutable cell matrix with cursor, pending-wrap, scroll,
//!   and data-preserving resize.
//! - **Screen**: the action sink wiring parser events into grid and style
//!   mutations.
//! - **Buffers**: the block write queue for bytes headed back to the child
//!   and the observational history rings.
//!
//! # Design principles
//!
//! - **No I/O**: all types are pure data + logic; the host adapter supplies
//!   bytes (see `weft-pty`).
//! - **Deterministic**: identical byte sequences always produce identical
//!   state, regardless of read chunking.
//! - **Total over input**: malformed sequences are absorbed, never raised.

pub mod buffers;
pub mod cell;
pub mod grid;
pub mod parser;
pub mod screen;

pub use buffers::{HistoryRing, WriteQueue};
pub use cell::{Attrs, Cell, Style, DEFAULT_BG, DEFAULT_FG};
pub use grid::Grid;
pub use parser::{Event, Params, Parser, Utf8Decoder, REPLACEMENT};
pub use screen::Screen;
