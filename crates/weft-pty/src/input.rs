//! Keypress translation: window events to bytes for the child.
//!
//! The windowing collaborator delivers a [`Keypress`]: a symbolic key id
//! plus whatever text the input method composed. Text passes through as raw
//! UTF-8; special keys without text translate to the common xterm
//! sequences. Keys with neither encode to nothing and are dropped upstream.

/// Symbolic key identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A plain character key (normally accompanied by composed text).
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Up,
    Down,
    Right,
    Left,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    /// Function key F1..F12.
    F(u8),
    /// A key this terminal does not translate.
    Unknown,
}

/// One keypress as delivered by the window system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keypress {
    pub key: Key,
    /// Text composed by the input method, if any. Takes precedence over the
    /// symbolic translation.
    pub text: String,
}

impl Keypress {
    /// A keypress carrying composed text (the common case for characters).
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let key = match text.chars().next() {
            Some(ch) if text.chars().count() == 1 => Key::Char(ch),
            _ => Key::Unknown,
        };
        Self { key, text }
    }

    /// A special key with no composed text.
    #[must_use]
    pub fn special(key: Key) -> Self {
        Self {
            key,
            text: String::new(),
        }
    }

    /// The bytes to transmit to the child for this keypress.
    ///
    /// Empty output means the key has no translation and should be dropped.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        if !self.text.is_empty() {
            return self.text.as_bytes().to_vec();
        }
        match self.key {
            Key::Char(ch) => {
                let mut buf = [0u8; 4];
                ch.encode_utf8(&mut buf).as_bytes().to_vec()
            }
            Key::Enter => b"\r".to_vec(),
            Key::Tab => b"\t".to_vec(),
            Key::Backspace => b"\x7f".to_vec(),
            Key::Escape => b"\x1b".to_vec(),
            Key::Up => b"\x1b[A".to_vec(),
            Key::Down => b"\x1b[B".to_vec(),
            Key::Right => b"\x1b[C".to_vec(),
            Key::Left => b"\x1b[D".to_vec(),
            Key::Home => b"\x1b[H".to_vec(),
            Key::End => b"\x1b[F".to_vec(),
            Key::PageUp => b"\x1b[5~".to_vec(),
            Key::PageDown => b"\x1b[6~".to_vec(),
            Key::Insert => b"\x1b[2~".to_vec(),
            Key::Delete => b"\x1b[3~".to_vec(),
            Key::F(n) => function_key(n),
            Key::Unknown => Vec::new(),
        }
    }
}

/// xterm encodings for F1..F12; anything else encodes to nothing.
fn function_key(n: u8) -> Vec<u8> {
    match n {
        1 => b"\x1bOP".to_vec(),
        2 => b"\x1bOQ".to_vec(),
        3 => b"\x1bOR".to_vec(),
        4 => b"\x1bOS".to_vec(),
        5 => b"\x1b[15~".to_vec(),
        6 => b"\x1b[17~".to_vec(),
        7 => b"\x1b[18~".to_vec(),
        8 => b"\x1b[19~".to_vec(),
        9 => b"\x1b[20~".to_vec(),
        10 => b"\x1b[21~".to_vec(),
        11 => b"\x1b[23~".to_vec(),
        12 => b"\x1b[24~".to_vec(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_passes_through_as_utf8() {
        assert_eq!(Keypress::from_text("é").encode(), "é".as_bytes());
        assert_eq!(Keypress::from_text("abc").encode(), b"abc");
    }

    #[test]
    fn text_takes_precedence_over_symbol() {
        let key = Keypress {
            key: Key::Up,
            text: "x".to_string(),
        };
        assert_eq!(key.encode(), b"x");
    }

    #[test]
    fn char_without_text_encodes_itself() {
        assert_eq!(Keypress::special(Key::Char('q')).encode(), b"q");
    }

    #[test]
    fn arrows_use_csi_final_letters() {
        assert_eq!(Keypress::special(Key::Up).encode(), b"\x1b[A");
        assert_eq!(Keypress::special(Key::Down).encode(), b"\x1b[B");
        assert_eq!(Keypress::special(Key::Right).encode(), b"\x1b[C");
        assert_eq!(Keypress::special(Key::Left).encode(), b"\x1b[D");
    }

    #[test]
    fn editing_keys_use_tilde_sequences() {
        assert_eq!(Keypress::special(Key::Delete).encode(), b"\x1b[3~");
        assert_eq!(Keypress::special(Key::PageUp).encode(), b"\x1b[5~");
    }

    #[test]
    fn low_function_keys_use_ss3() {
        assert_eq!(Keypress::special(Key::F(1)).encode(), b"\x1bOP");
        assert_eq!(Keypress::special(Key::F(5)).encode(), b"\x1b[15~");
        assert_eq!(Keypress::special(Key::F(12)).encode(), b"\x1b[24~");
    }

    #[test]
    fn out_of_range_function_key_is_dropped() {
        assert!(Keypress::special(Key::F(13)).encode().is_empty());
        assert!(Keypress::special(Key::F(0)).encode().is_empty());
    }

    #[test]
    fn unknown_key_encodes_to_nothing() {
        assert!(Keypress::special(Key::Unknown).encode().is_empty());
    }

    #[test]
    fn backspace_sends_del() {
        assert_eq!(Keypress::special(Key::Backspace).encode(), b"\x7f");
    }
}
