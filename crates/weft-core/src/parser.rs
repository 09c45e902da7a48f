//! VT/ANSI escape sequence parser.
//!
//! A deterministic state machine after the public DEC ANSI parser reference
//! (vt100.net/emu/dec_ansi_parser). It classifies every incoming Unicode
//! scalar as printable text, a single C0/C1 control, or part of a multi-byte
//! escape/CSI/DCS/OSC/APC sequence, and emits structured [`Event`]s.
//!
//! The parser is total: malformed sequences are absorbed by the IGNORE
//! states or the string states, and no input can make it error out.
//! Transient storage is bounded by the length of the current sequence.

use std::mem;

use smallvec::SmallVec;

/// Inline capacity for CSI/DCS parameter lists.
///
/// Most SGR and cursor sequences carry ≤ 4 parameters; this avoids a heap
/// allocation for the common case while remaining transparent to consumers
/// via `Deref<Target = [u16]>`.
pub type Params = SmallVec<[u16; 4]>;

/// Replacement character stamped for ill-formed UTF-8.
pub const REPLACEMENT: char = '\u{FFFD}';

/// Parser output events.
///
/// The parser pushes these into a caller-supplied queue; the screen drains
/// the queue in order. A CSI with no digits yields an empty `args` list —
/// consumers interpret a missing parameter as its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A single C0/C1 control (CR, LF, TAB, BEL, ...).
    Control(u8),
    /// ESC sequence: intermediates plus the final byte (e.g. `"c"`, `"#8"`).
    Escape(String),
    /// CSI sequence: private markers/intermediates/final plus parameters.
    Csi { command: String, args: Params },
    /// Device control string: intermediates, parameters, and opaque payload.
    /// The payload starts with the final byte that opened passthrough.
    Dcs {
        command: String,
        args: Params,
        payload: String,
    },
    /// Operating system command payload (title setting and friends).
    Osc(String),
}

/// The fourteen machine states of the DEC ANSI parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    EscapeIntermediate,
    CsiEntry,
    CsiParam,
    CsiIntermediate,
    CsiIgnore,
    DcsEntry,
    DcsParam,
    DcsIntermediate,
    DcsPassthrough,
    DcsIgnore,
    OscString,
    SosPmApcString,
}

/// Escape sequence parser state.
#[derive(Debug, Clone)]
pub struct Parser {
    state: State,
    command: String,
    payload: String,
    args: Params,
    arg_in_progress: bool,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser in ground state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            command: String::new(),
            payload: String::new(),
            args: Params::new(),
            arg_in_progress: false,
        }
    }

    /// Feed one Unicode scalar; events are appended to `out`.
    ///
    /// Returns `false` when the scalar is plain printable text that the
    /// caller should stamp into the grid, `true` when the parser consumed it.
    /// The ground fast path covers `[0x20, 0x7F)` and everything at or above
    /// `U+00A0`.
    pub fn consume(&mut self, rune: char, out: &mut Vec<Event>) -> bool {
        if self.state == State::Ground {
            let cp = rune as u32;
            if (0x20..0x7f).contains(&cp) || cp >= 0xa0 {
                return false;
            }
        }
        self.handle(rune, out);
        true
    }

    fn handle(&mut self, rune: char, out: &mut Vec<Event>) {
        let cp = rune as u32;
        // Raw C1 scalars (U+0080..U+009F) dispatch as their ESC equivalents.
        // Scalars at or above U+00A0 are never collapsed; they only reach
        // here inside sequences, where the state rules below treat them as
        // printable sequence content.
        if cp < 0xa0 {
            let c = cp as u8;
            match c {
                0x1b => return self.transition(State::Escape, None, out),
                0x90 => return self.transition(State::DcsEntry, None, out),
                0x9b => return self.transition(State::CsiEntry, None, out),
                0x9c => return self.transition(State::Ground, None, out),
                0x9d => return self.transition(State::OscString, None, out),
                0x98 | 0x9e | 0x9f => {
                    return self.transition(State::SosPmApcString, None, out);
                }
                0x18 | 0x1a | 0x80..=0x8f | 0x91..=0x97 | 0x99 | 0x9a => {
                    return self.transition(State::Ground, Some(Event::Control(c)), out);
                }
                0x7f => return, // DEL: dropped everywhere, even in OSC payloads
                _ => {}
            }
            // Remaining C0 controls have uniform rules per state.
            if c < 0x20 {
                match self.state {
                    State::Ground
                    | State::Escape
                    | State::EscapeIntermediate
                    | State::CsiEntry
                    | State::CsiParam
                    | State::CsiIntermediate
                    | State::CsiIgnore => out.push(Event::Control(c)),
                    State::DcsPassthrough => self.payload.push(rune),
                    _ => {}
                }
                return;
            }
        }
        // Printable sequence content (>= 0x20), dispatched per state.
        match self.state {
            State::Ground => {}
            State::Escape => match cp {
                0x50 => self.transition(State::DcsEntry, None, out),
                0x5b => self.transition(State::CsiEntry, None, out),
                0x58 | 0x5e | 0x5f => self.transition(State::SosPmApcString, None, out),
                0x5d => self.transition(State::OscString, None, out),
                _ => self.escape_intermediate(rune, out),
            },
            State::EscapeIntermediate => self.escape_intermediate(rune, out),
            State::CsiEntry => {
                if (0x3c..0x40).contains(&cp) {
                    self.command.push(rune);
                    self.transition(State::CsiParam, None, out);
                } else {
                    self.csi_param(rune, out);
                }
            }
            State::CsiParam => self.csi_param(rune, out),
            State::CsiIntermediate => self.csi_intermediate(rune, out),
            State::CsiIgnore => {
                if cp >= 0x40 {
                    self.transition(State::Ground, None, out);
                }
            }
            State::DcsEntry => {
                if (0x3c..0x40).contains(&cp) {
                    self.command.push(rune);
                    self.transition(State::DcsParam, None, out);
                } else {
                    self.dcs_param(rune, out);
                }
            }
            State::DcsParam => self.dcs_param(rune, out),
            State::DcsIntermediate => self.dcs_intermediate(rune, out),
            State::DcsPassthrough => self.payload.push(rune),
            State::DcsIgnore => {}
            State::OscString => self.payload.push(rune),
            State::SosPmApcString => {}
        }
    }

    fn escape_intermediate(&mut self, rune: char, out: &mut Vec<Event>) {
        self.command.push(rune);
        if (rune as u32) < 0x30 {
            self.transition(State::EscapeIntermediate, None, out);
        } else {
            let event = Event::Escape(mem::take(&mut self.command));
            self.transition(State::Ground, Some(event), out);
        }
    }

    fn csi_param(&mut self, rune: char, out: &mut Vec<Event>) {
        if self.param_parse(rune) {
            self.transition(State::CsiParam, None, out);
        } else {
            self.csi_intermediate(rune, out);
        }
    }

    fn csi_intermediate(&mut self, rune: char, out: &mut Vec<Event>) {
        self.command.push(rune);
        let cp = rune as u32;
        if cp >= 0x40 {
            let event = Event::Csi {
                command: mem::take(&mut self.command),
                args: mem::take(&mut self.args),
            };
            self.transition(State::Ground, Some(event), out);
        } else if cp < 0x30 {
            self.transition(State::CsiIntermediate, None, out);
        } else {
            self.transition(State::CsiIgnore, None, out);
        }
    }

    fn dcs_param(&mut self, rune: char, out: &mut Vec<Event>) {
        if self.param_parse(rune) {
            self.transition(State::DcsParam, None, out);
        } else {
            self.dcs_intermediate(rune, out);
        }
    }

    fn dcs_intermediate(&mut self, rune: char, out: &mut Vec<Event>) {
        let cp = rune as u32;
        if cp >= 0x40 {
            // The final byte opens passthrough; it leads the payload so the
            // consumer can still dispatch on it.
            self.payload.push(rune);
            self.transition(State::DcsPassthrough, None, out);
        } else if cp < 0x30 {
            self.command.push(rune);
            self.transition(State::DcsIntermediate, None, out);
        } else {
            self.transition(State::DcsIgnore, None, out);
        }
    }

    /// Lazy parameter accumulation: a digit after `;` (or at the start)
    /// opens a fresh integer; no digits at all leaves `args` empty.
    fn param_parse(&mut self, rune: char) -> bool {
        match rune {
            ';' => {
                self.arg_in_progress = false;
                true
            }
            '0'..='9' => {
                if !self.arg_in_progress {
                    self.args.push(0);
                    self.arg_in_progress = true;
                }
                let digit = (rune as u8 - b'0') as u16;
                if let Some(arg) = self.args.last_mut() {
                    *arg = arg.saturating_mul(10).saturating_add(digit);
                }
                true
            }
            _ => false,
        }
    }

    /// Run the exit action of the current state, the optional transition
    /// event, and the entry action of the next state, in that order.
    fn transition(&mut self, next: State, event: Option<Event>, out: &mut Vec<Event>) {
        match self.state {
            State::OscString => out.push(Event::Osc(mem::take(&mut self.payload))),
            State::DcsPassthrough => out.push(Event::Dcs {
                command: mem::take(&mut self.command),
                args: mem::take(&mut self.args),
                payload: mem::take(&mut self.payload),
            }),
            _ => {}
        }
        if let Some(event) = event {
            out.push(event);
        }
        if matches!(next, State::Escape | State::CsiEntry | State::DcsEntry) {
            self.command.clear();
            self.payload.clear();
            self.args.clear();
            self.arg_in_progress = false;
        }
        self.state = next;
    }
}

/// Streaming UTF-8 decoder.
///
/// Feeds one byte at a time and yields at most two scalars per byte: an
/// ill-formed sequence interrupted by a valid byte produces [`REPLACEMENT`]
/// followed by the replay of the interrupting byte. Overlong encodings,
/// surrogates, and scalars past U+10FFFF are rejected at the earliest byte
/// that proves them ill-formed (Unicode "maximal subpart" policy).
#[derive(Debug, Clone, Default)]
pub struct Utf8Decoder {
    scalar: u32,
    remaining: u8,
    /// Bounds for the next continuation byte; tightened by E0/ED/F0/F4 leads.
    lower: u8,
    upper: u8,
}

impl Utf8Decoder {
    /// Create a decoder with no sequence in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte, yielding zero, one, or two scalars.
    pub fn push(&mut self, byte: u8) -> SmallVec<[char; 2]> {
        let mut out = SmallVec::new();
        self.step(byte, &mut out);
        out
    }

    fn step(&mut self, byte: u8, out: &mut SmallVec<[char; 2]>) {
        if self.remaining > 0 {
            if (self.lower..=self.upper).contains(&byte) {
                self.scalar = (self.scalar << 6) | u32::from(byte & 0x3f);
                self.remaining -= 1;
                self.lower = 0x80;
                self.upper = 0xbf;
                if self.remaining == 0 {
                    out.push(char::from_u32(self.scalar).unwrap_or(REPLACEMENT));
                }
            } else {
                // Ill-formed: stand in a replacement for the truncated
                // sequence, then replay this byte from a clean state.
                self.remaining = 0;
                out.push(REPLACEMENT);
                self.step(byte, out);
            }
            return;
        }
        match byte {
            0x00..=0x7f => out.push(byte as char),
            0xc2..=0xdf => self.begin(byte & 0x1f, 1, 0x80, 0xbf),
            0xe0 => self.begin(0, 2, 0xa0, 0xbf),
            0xe1..=0xec | 0xee..=0xef => self.begin(byte & 0x0f, 2, 0x80, 0xbf),
            0xed => self.begin(0x0d, 2, 0x80, 0x9f),
            0xf0 => self.begin(0, 3, 0x90, 0xbf),
            0xf1..=0xf3 => self.begin(byte & 0x07, 3, 0x80, 0xbf),
            0xf4 => self.begin(0x04, 3, 0x80, 0x8f),
            // Stray continuations, overlong leads (C0/C1), and leads past
            // the Unicode range (F5..FF).
            _ => out.push(REPLACEMENT),
        }
    }

    fn begin(&mut self, bits: u8, remaining: u8, lower: u8, upper: u8) {
        self.scalar = u32::from(bits);
        self.remaining = remaining;
        self.lower = lower;
        self.upper = upper;
    }
}
