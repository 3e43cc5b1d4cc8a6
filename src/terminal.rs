//! Terminal handling with raw ANSI escape sequences
//! Raw mode and window size come straight from libc; no TUI library involved.

use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;
use std::time::Duration;

use tracing::debug;

use crate::canvas::Backend;
use crate::screen::Screen;
use crate::ui::geometry::Bounds;

/// Cell attribute. Dialogs only need a plain look, an emphasized title,
/// an underlined subtitle and the reverse video used for selection.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Attr {
    #[default]
    Normal,
    Bold,
    Underline,
    Reverse,
}

impl Attr {
    /// SGR parameter for this attribute (always preceded by a reset)
    pub fn to_sgr(self) -> &'static str {
        match self {
            Attr::Normal => "0",
            Attr::Bold => "0;1",
            Attr::Underline => "0;4",
            Attr::Reverse => "0;7",
        }
    }

    /// Attribute for a selectable element
    pub fn selection(selected: bool) -> Attr {
        if selected {
            Attr::Reverse
        } else {
            Attr::Normal
        }
    }
}

/// Key events including special keys
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    ShiftTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F(u8), // F1-F12
    Alt(char),
    Ctrl(char),
    Unknown(Vec<u8>),
}

/// Original terminal settings for restoration
static mut ORIG_TERMIOS: Option<libc::termios> = None;

/// Terminal state manager
pub struct Terminal {
    stdout: io::Stdout,
    width: u16,
    height: u16,
    /// Bytes read from stdin but not yet turned into keys
    pending: Vec<u8>,
}

impl Terminal {
    /// Initialize terminal in raw mode
    pub fn new() -> io::Result<Self> {
        let mut term = Self {
            stdout: io::stdout(),
            width: 80,
            height: 24,
            pending: Vec::new(),
        };

        term.update_size();
        term.enable_raw_mode()?;

        term.write_raw("\x1b[?1049h")?; // Alternate screen
        term.write_raw("\x1b[?25l")?; // Hide cursor
        term.write_raw("\x1b[2J")?; // Clear screen
        term.write_raw("\x1b[H")?; // Home cursor
        term.flush()?;

        debug!(width = term.width, height = term.height, "terminal in raw mode");
        Ok(term)
    }

    /// Update terminal size from ioctl
    pub fn update_size(&mut self) {
        unsafe {
            let mut ws: libc::winsize = std::mem::zeroed();
            if libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) == 0
                && ws.ws_col > 0
                && ws.ws_row > 0
            {
                self.width = ws.ws_col;
                self.height = ws.ws_row;
            }
        }
    }

    /// Enable raw mode (disable canonical mode, echo, etc.)
    fn enable_raw_mode(&self) -> io::Result<()> {
        unsafe {
            let fd = io::stdin().as_raw_fd();
            let mut termios: libc::termios = std::mem::zeroed();

            if libc::tcgetattr(fd, &mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            ORIG_TERMIOS = Some(termios);

            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN);
            termios.c_iflag &= !(libc::IXON | libc::ICRNL | libc::BRKINT | libc::INPCK | libc::ISTRIP);
            termios.c_oflag &= !libc::OPOST;
            termios.c_cflag |= libc::CS8;

            // Reads never block on their own; waiting is done with poll()
            termios.c_cc[libc::VMIN] = 0;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }

    /// Disable raw mode (restore original settings)
    fn disable_raw_mode(&self) -> io::Result<()> {
        unsafe {
            if let Some(orig) = ORIG_TERMIOS {
                let fd = io::stdin().as_raw_fd();
                if libc::tcsetattr(fd, libc::TCSAFLUSH, &orig) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }
        }
        Ok(())
    }

    /// Write raw bytes to terminal
    pub fn write_raw(&mut self, s: &str) -> io::Result<()> {
        self.stdout.write_all(s.as_bytes())
    }

    /// Flush output buffer
    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    /// Move cursor to position (1-based, like ANSI)
    pub fn goto(&mut self, row: u16, col: u16) -> io::Result<()> {
        write!(self.stdout, "\x1b[{};{}H", row, col)
    }

    /// Switch the rendition used for following characters
    pub fn set_attr(&mut self, attr: Attr) -> io::Result<()> {
        write!(self.stdout, "\x1b[{}m", attr.to_sgr())
    }

    /// Write a character at current position
    pub fn write_char(&mut self, c: char) -> io::Result<()> {
        write!(self.stdout, "{}", c)
    }

    pub fn show_cursor(&mut self) -> io::Result<()> {
        self.write_raw("\x1b[?25h")
    }

    pub fn hide_cursor(&mut self) -> io::Result<()> {
        self.write_raw("\x1b[?25l")
    }

    /// Wait up to `timeout` for stdin to become readable. `None` waits forever.
    fn wait_readable(&self, timeout: Option<Duration>) -> io::Result<bool> {
        let mut fds = libc::pollfd {
            fd: io::stdin().as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let millis = match timeout {
            Some(t) => t.as_millis().min(i32::MAX as u128) as i32,
            None => -1,
        };
        let rc = unsafe { libc::poll(&mut fds, 1, millis) };
        if rc >= 0 {
            return Ok(rc > 0);
        }
        let err = io::Error::last_os_error();
        // A resize (SIGWINCH) interrupts poll; report "no key" so the
        // caller redraws against the new size.
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(false);
        }
        Err(err)
    }

    /// Read one key, waiting at most `timeout` (`None` blocks).
    /// Keys already buffered from an earlier read come first.
    pub fn read_key(&mut self, timeout: Option<Duration>) -> io::Result<Option<Key>> {
        if self.pending.is_empty() {
            if !self.wait_readable(timeout)? {
                return Ok(None);
            }
            if self.fill()? == 0 {
                return Ok(None);
            }
            // A lone ESC may be the start of a sequence still in flight
            if self.pending == [0x1b] {
                std::thread::sleep(Duration::from_millis(10));
                if let Err(e) = self.fill() {
                    debug!(%e, "no bytes after escape");
                }
            }
        }
        Ok(take_key(&mut self.pending))
    }

    /// Append whatever stdin has right now
    fn fill(&mut self) -> io::Result<usize> {
        let mut buf = [0u8; 64];
        let n = io::stdin().read(&mut buf)?;
        self.pending.extend_from_slice(&buf[..n]);
        Ok(n)
    }
}

/// Remove the first key from `buf` and parse it
pub fn take_key(buf: &mut Vec<u8>) -> Option<Key> {
    if buf.is_empty() {
        return None;
    }
    let len = key_len(buf);
    let key = parse_key(&buf[..len]);
    buf.drain(..len);
    Some(key)
}

/// Length of the first key in `buf`: a whole escape sequence, one UTF-8
/// scalar, or a single byte
fn key_len(buf: &[u8]) -> usize {
    match buf {
        [] => 0,
        [0x1b, b'[', rest @ ..] => match rest.iter().position(|b| (0x40..=0x7e).contains(b)) {
            Some(end) => end + 3,
            None => buf.len(),
        },
        [0x1b, b'O', _, ..] => 3,
        [0x1b, c, ..] if c.is_ascii_alphabetic() => 2,
        [lead @ 0xc0..=0xff, rest @ ..] => {
            let width = match *lead {
                0xc0..=0xdf => 2,
                0xe0..=0xef => 3,
                _ => 4,
            };
            let continuation = rest
                .iter()
                .take(width - 1)
                .take_while(|b| (0x80..=0xbf).contains(*b))
                .count();
            continuation + 1
        }
        _ => 1,
    }
}

/// Parse raw bytes into a Key
pub fn parse_key(buf: &[u8]) -> Key {
    match buf {
        [b'\r'] | [b'\n'] => Key::Enter,
        [0x1b] => Key::Escape,
        [0x7f] | [0x08] => Key::Backspace,
        [b'\t'] => Key::Tab,

        // Ctrl+letter (0x01-0x1a = Ctrl+A through Ctrl+Z)
        [c] if *c >= 1 && *c <= 26 => Key::Ctrl((b'a' + c - 1) as char),

        [c] if *c >= 32 && *c < 127 => Key::Char(*c as char),

        // UTF-8 sequences (2-4 bytes)
        _ if buf.len() >= 2 && buf[0] >= 0xC0 => match std::str::from_utf8(buf) {
            Ok(s) => match s.chars().next() {
                Some(c) => Key::Char(c),
                None => Key::Unknown(buf.to_vec()),
            },
            Err(_) => Key::Unknown(buf.to_vec()),
        },

        [0x1b, b'[', b'Z'] => Key::ShiftTab,

        [0x1b, b'[', b'A'] | [0x1b, b'O', b'A'] => Key::Up,
        [0x1b, b'[', b'B'] | [0x1b, b'O', b'B'] => Key::Down,
        [0x1b, b'[', b'C'] | [0x1b, b'O', b'C'] => Key::Right,
        [0x1b, b'[', b'D'] | [0x1b, b'O', b'D'] => Key::Left,
        [0x1b, b'[', b'H'] | [0x1b, b'O', b'H'] => Key::Home,
        [0x1b, b'[', b'F'] | [0x1b, b'O', b'F'] => Key::End,
        [0x1b, b'[', b'1', b'~'] | [0x1b, b'[', b'7', b'~'] => Key::Home,
        [0x1b, b'[', b'4', b'~'] | [0x1b, b'[', b'8', b'~'] => Key::End,
        [0x1b, b'[', b'2', b'~'] => Key::Insert,
        [0x1b, b'[', b'3', b'~'] => Key::Delete,
        [0x1b, b'[', b'5', b'~'] => Key::PageUp,
        [0x1b, b'[', b'6', b'~'] => Key::PageDown,

        // Function keys
        [0x1b, b'O', b'P'] | [0x1b, b'[', b'1', b'1', b'~'] => Key::F(1),
        [0x1b, b'O', b'Q'] | [0x1b, b'[', b'1', b'2', b'~'] => Key::F(2),
        [0x1b, b'O', b'R'] | [0x1b, b'[', b'1', b'3', b'~'] => Key::F(3),
        [0x1b, b'O', b'S'] | [0x1b, b'[', b'1', b'4', b'~'] => Key::F(4),
        [0x1b, b'[', b'1', b'5', b'~'] => Key::F(5),
        [0x1b, b'[', b'1', b'7', b'~'] => Key::F(6),
        [0x1b, b'[', b'1', b'8', b'~'] => Key::F(7),
        [0x1b, b'[', b'1', b'9', b'~'] => Key::F(8),
        [0x1b, b'[', b'2', b'0', b'~'] => Key::F(9),
        [0x1b, b'[', b'2', b'1', b'~'] => Key::F(10),
        [0x1b, b'[', b'2', b'3', b'~'] => Key::F(11),
        [0x1b, b'[', b'2', b'4', b'~'] => Key::F(12),

        // Alt+letter (ESC followed by letter)
        [0x1b, c] if c.is_ascii_lowercase() => Key::Alt(*c as char),
        [0x1b, c] if c.is_ascii_uppercase() => Key::Alt((*c as char).to_ascii_lowercase()),

        _ => Key::Unknown(buf.to_vec()),
    }
}

impl Backend for Terminal {
    fn size(&mut self) -> Bounds {
        self.update_size();
        Bounds::new(self.height, self.width)
    }

    fn read_key(&mut self, timeout: Option<Duration>) -> io::Result<Option<Key>> {
        Terminal::read_key(self, timeout)
    }

    fn present(&mut self, screen: &mut Screen) -> io::Result<()> {
        screen.flush(self)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.set_attr(Attr::Normal);
        let _ = self.show_cursor();
        let _ = self.write_raw("\x1b[2J\x1b[H");
        let _ = self.write_raw("\x1b[?1049l");
        let _ = self.flush();
        let _ = self.disable_raw_mode();
        debug!("terminal restored");
    }
}
