//! Shell spawning over a real pseudo-terminal.
//!
//! Uses `portable-pty` for the platform plumbing: open the pair, size it,
//! and spawn the user's shell on the slave side. The returned session
//! implements `Read + Write` over the master, so it slots straight into
//! [`Term`](crate::Term) for integration tests and demos. The session reads
//! block; a production event loop would put the master fd in non-blocking
//! mode and poll it.

use std::fmt;
use std::io::{self, Read, Write};

use portable_pty::{native_pty_system, CommandBuilder, PtySize};

/// Configuration for spawning a shell in a fresh PTY.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// PTY width in columns.
    pub cols: u16,
    /// PTY height in rows.
    pub rows: u16,
    /// TERM for the child (defaults to xterm-256color).
    pub term: Option<String>,
    /// Program to run; defaults to `$SHELL`, falling back to `/bin/sh`.
    pub shell: Option<String>,
    /// Extra environment variables for the child.
    pub env: Vec<(String, String)>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 25,
            term: Some("xterm-256color".to_string()),
            shell: None,
            env: Vec::new(),
        }
    }
}

impl ShellConfig {
    /// Override the PTY dimensions.
    #[must_use]
    pub fn with_size(mut self, cols: u16, rows: u16) -> Self {
        self.cols = cols;
        self.rows = rows;
        self
    }

    /// Run a specific program instead of `$SHELL`.
    #[must_use]
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = Some(shell.into());
        self
    }

    /// Add an environment variable for the child.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// A spawned shell with its PTY master endpoints.
pub struct ShellSession {
    child: Box<dyn portable_pty::Child + Send + Sync>,
    master: Box<dyn portable_pty::MasterPty + Send>,
    reader: Box<dyn Read + Send>,
    writer: Box<dyn Write + Send>,
}

impl fmt::Debug for ShellSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellSession")
            .field("child_pid", &self.child.process_id())
            .finish()
    }
}

/// Open a PTY pair and spawn the configured shell on the slave side.
pub fn spawn_shell(config: &ShellConfig) -> io::Result<ShellSession> {
    let program = config
        .shell
        .clone()
        .or_else(|| std::env::var("SHELL").ok())
        .unwrap_or_else(|| "/bin/sh".to_string());
    let mut cmd = CommandBuilder::new(program);
    if let Some(term) = &config.term {
        cmd.env("TERM", term);
    }
    for (key, value) in &config.env {
        cmd.env(key, value);
    }

    let pty_system = native_pty_system();
    let pair = pty_system
        .openpty(PtySize {
            rows: config.rows,
            cols: config.cols,
            pixel_width: 0,
            pixel_height: 0,
        })
        .map_err(pty_error)?;
    let child = pair.slave.spawn_command(cmd).map_err(pty_error)?;
    let reader = pair.master.try_clone_reader().map_err(pty_error)?;
    let writer = pair.master.take_writer().map_err(pty_error)?;

    Ok(ShellSession {
        child,
        master: pair.master,
        reader,
        writer,
    })
}

impl ShellSession {
    /// Tell the kernel (and thus the child) about a window size change.
    pub fn resize(&self, cols: u16, rows: u16) -> io::Result<()> {
        self.master
            .resize(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(pty_error)
    }

    /// Whether the child is still running.
    pub fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Child process id, when the platform exposes one.
    #[must_use]
    pub fn child_pid(&self) -> Option<u32> {
        self.child.process_id()
    }
}

impl Read for ShellSession {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Write for ShellSession {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Drop for ShellSession {
    fn drop(&mut self) {
        // Best-effort: flush pending input and stop the child.
        let _ = self.writer.flush();
        let _ = self.child.kill();
    }
}

fn pty_error<E: fmt::Display>(err: E) -> io::Error {
    io::Error::other(err.to_string())
}
