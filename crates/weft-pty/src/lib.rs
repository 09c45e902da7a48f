#![forbid(unsafe_code)]

//! PTY plumbing for the weft terminal engine.
//!
//! # Why this exists
//!
//! `weft-core` is deliberately I/O-free. This crate supplies the byte pump
//! that connects a screen to a real child process: draining the PTY master
//! into the engine, queueing keypress bytes back, and spawning the shell in
//! the first place.
//!
//! # Modules
//!
//! - [`term`] — the byte pump: `on_readable`/`on_writable`/`needs_write`
//!   readiness callbacks around a `Read + Write` PTY master.
//! - [`input`] — keypress-to-bytes translation (raw text plus the common
//!   xterm special-key sequences).
//! - [`shell`] — opening the PTY pair and spawning `$SHELL` via
//!   `portable-pty`.
//!
//! # How it fits in the system
//!
//! The surrounding event loop owns scheduling: it polls the PTY fd and the
//! window connection, then calls into [`Term`] when readiness fires. The
//! core is single-threaded and run-to-completion; no locks, no workers.

pub mod input;
pub mod shell;
pub mod term;

pub use input::{Key, Keypress};
pub use shell::{spawn_shell, ShellConfig, ShellSession};
pub use term::{Term, TermConfig};
