//! Input handling and key event processing

use crate::terminal::Key;

/// Processed input events the dialogs dispatch on
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Regular character input
    Char(char),
    /// Navigation keys
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    Home,
    End,
    PageUp,
    PageDown,
    /// Editing keys
    Enter,
    Backspace,
    Delete,
    Tab,
    ShiftTab,
    Escape,
    /// Ctrl+letter, lowercase
    Ctrl(char),
    /// Anything the dialogs have no use for
    Unknown,
}

impl From<Key> for InputEvent {
    fn from(key: Key) -> Self {
        match key {
            Key::Char(c) if !c.is_control() => InputEvent::Char(c),
            Key::Enter => InputEvent::Enter,
            Key::Escape => InputEvent::Escape,
            Key::Backspace => InputEvent::Backspace,
            Key::Delete => InputEvent::Delete,
            Key::Tab => InputEvent::Tab,
            Key::ShiftTab => InputEvent::ShiftTab,
            Key::Up => InputEvent::CursorUp,
            Key::Down => InputEvent::CursorDown,
            Key::Left => InputEvent::CursorLeft,
            Key::Right => InputEvent::CursorRight,
            Key::Home => InputEvent::Home,
            Key::End => InputEvent::End,
            Key::PageUp => InputEvent::PageUp,
            Key::PageDown => InputEvent::PageDown,
            Key::Ctrl(c) => InputEvent::Ctrl(c),
            _ => InputEvent::Unknown,
        }
    }
}

impl InputEvent {
    /// Bytes a terminal would send for this key, used when forwarding
    /// keystrokes to a child process. `None` for keys with no encoding.
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        let bytes: &[u8] = match self {
            InputEvent::Char(c) => {
                let mut buf = [0u8; 4];
                return Some(c.encode_utf8(&mut buf).as_bytes().to_vec());
            }
            InputEvent::Enter => b"\r",
            InputEvent::Tab => b"\t",
            InputEvent::ShiftTab => b"\x1b[Z",
            InputEvent::Escape => b"\x1b",
            InputEvent::Backspace => b"\x7f",
            InputEvent::Delete => b"\x1b[3~",
            InputEvent::CursorUp => b"\x1b[A",
            InputEvent::CursorDown => b"\x1b[B",
            InputEvent::CursorRight => b"\x1b[C",
            InputEvent::CursorLeft => b"\x1b[D",
            InputEvent::Home => b"\x1b[H",
            InputEvent::End => b"\x1b[F",
            InputEvent::PageUp => b"\x1b[5~",
            InputEvent::PageDown => b"\x1b[6~",
            InputEvent::Ctrl(c) if c.is_ascii_lowercase() => {
                return Some(vec![*c as u8 - b'a' + 1]);
            }
            InputEvent::Ctrl(_) | InputEvent::Unknown => return None,
        };
        Some(bytes.to_vec())
    }

    /// Digit key value, for menus that jump straight to an entry
    pub fn digit(&self) -> Option<u32> {
        match self {
            InputEvent::Char(c) => c.to_digit(10),
            _ => None,
        }
    }
}
