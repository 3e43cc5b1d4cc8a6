//! Interactive child process in a box
//!
//! Output is stripped of escape sequences, wrapped to the box and kept in a
//! scrollback no taller than the box. Editing keys work on a pending input
//! line that is sent, with a newline, on Enter; every other key goes to the
//! child as the bytes a terminal would have sent.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{debug, info};

use crate::canvas::{Canvas, ModalSession};
use crate::error::Result;
use crate::input::InputEvent;
use crate::pty::{Process, PtyProcess, ReadOutcome};
use crate::screen::Surface;
use crate::terminal::Attr;
use crate::ui::geometry::{Bounds, Rect};
use crate::ui::line_edit::LineEdit;
use crate::ui::panel::{draw, HasTextField, PanelBase, Widget};

/// Longest pending line
const PENDING_MAX: usize = 1024;

const TAB_STOP: usize = 8;

const PROMPT: &str = "> ";

/// Wrapped output lines, oldest dropped first
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scrollback {
    lines: VecDeque<String>,
    partial: String,
    width: usize,
    capacity: usize,
}

impl Scrollback {
    pub fn new(width: usize, capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            partial: String::new(),
            width: width.max(1),
            capacity,
        }
    }

    /// Adopt a new wrap width and height. Lines already wrapped stay as they are.
    pub fn fit(&mut self, width: usize, capacity: usize) {
        self.width = width.max(1);
        self.capacity = capacity;
        self.trim();
    }

    /// Append plain text. Newlines end a line, backspace erases, tabs expand
    /// and other control characters are dropped.
    pub fn push_text(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\n' => self.commit(),
                '\x08' => {
                    self.partial.pop();
                }
                '\t' => {
                    let used = self.partial.chars().count() % self.width;
                    let pad = (TAB_STOP - used % TAB_STOP).min(self.width - used);
                    for _ in 0..pad {
                        self.push_char(' ');
                    }
                }
                c if c.is_control() => {}
                c => self.push_char(c),
            }
        }
    }

    fn push_char(&mut self, ch: char) {
        if self.partial.chars().count() >= self.width {
            self.commit();
        }
        self.partial.push(ch);
    }

    fn commit(&mut self) {
        let line = std::mem::take(&mut self.partial);
        self.lines.push_back(line);
        self.trim();
    }

    fn trim(&mut self) {
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }

    /// The last `rows` display rows, the unfinished line included
    pub fn visible(&self, rows: usize) -> Vec<&str> {
        let mut shown: Vec<&str> = self.lines.iter().map(String::as_str).collect();
        if !self.partial.is_empty() {
            shown.push(&self.partial);
        }
        let skip = shown.len().saturating_sub(rows);
        shown.split_off(skip)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.partial.is_empty()
    }
}

/// Turns a byte stream with terminal escapes into plain text
struct PlainText<'a> {
    out: &'a mut String,
}

impl vte::Perform for PlainText<'_> {
    fn print(&mut self, c: char) {
        self.out.push(c);
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\t' | 0x08) {
            self.out.push(byte as char);
        }
    }
}

/// A boxed view of a child process
pub struct ShellBox {
    base: PanelBase,
    command: Vec<String>,
    scrollback: Scrollback,
    pending: LineEdit,
    parser: vte::Parser,
}

impl ShellBox {
    pub fn new(title: impl Into<String>, command: Vec<String>) -> Self {
        Self {
            base: PanelBase::new(title, ""),
            command,
            // refitted to the box on every pass
            scrollback: Scrollback::new(80, 24),
            pending: LineEdit::new("", PENDING_MAX),
            parser: vte::Parser::new(),
        }
    }

    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    /// Spawn the command on a pty sized to the box and run until it exits
    pub fn show(&mut self, canvas: &mut Canvas) -> Result<()> {
        let rect = self.layout(canvas.bounds())?;
        let (rows, cols) = output_area(rect);
        let mut process = PtyProcess::spawn(&self.command, rows, cols)?;
        self.run_with(canvas, &mut process)
    }

    /// Run the box against an already started process
    pub fn run_with<P: Process + ?Sized>(&mut self, canvas: &mut Canvas, process: &mut P) -> Result<()> {
        let rect = self.layout(canvas.bounds())?;
        let mut session = ModalSession::open(canvas, rect, true);
        let poll = session.settings().poll_interval;
        info!(command = ?self.command, "shell box opened");
        let mut area = output_area(rect);
        loop {
            let rect = self.layout(session.bounds())?;
            let (rows, cols) = output_area(rect);
            if (rows, cols) != area {
                process.resize(rows, cols)?;
                area = (rows, cols);
            }
            self.scrollback.fit(cols as usize, rows as usize);

            match process.read(poll) {
                ReadOutcome::Data(bytes) => self.feed(&bytes),
                ReadOutcome::Idle if !process.is_alive() => {
                    info!("child exited");
                    break;
                }
                ReadOutcome::Idle => {}
                ReadOutcome::Closed => {
                    info!("child output closed");
                    break;
                }
            }

            draw(&mut session, self)?;
            if let Some(event) = session.read_event(Some(Duration::ZERO))? {
                if let Some(bytes) = self.handle_key(&event) {
                    match process.write(&bytes) {
                        Ok(()) => {}
                        Err(e) if !process.is_alive() => {
                            info!(%e, "child exited before input was written");
                            break;
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }
        Ok(())
    }

    /// Strip escapes from `bytes` and add the text to the scrollback
    pub fn feed(&mut self, bytes: &[u8]) {
        let mut text = String::new();
        let mut performer = PlainText { out: &mut text };
        for &byte in bytes {
            self.parser.advance(&mut performer, byte);
        }
        self.scrollback.push_text(&text);
    }

    /// Apply a key to the pending line. Returns the bytes to send, if any.
    pub fn handle_key(&mut self, event: &InputEvent) -> Option<Vec<u8>> {
        match event {
            InputEvent::Char(ch) => {
                if !self.pending.insert(*ch) {
                    debug!("pending line full");
                }
            }
            InputEvent::Backspace => {
                self.pending.backspace();
            }
            InputEvent::Delete => {
                self.pending.delete_forward();
            }
            InputEvent::CursorLeft => {
                self.pending.move_cursor(-1);
            }
            InputEvent::CursorRight => {
                self.pending.move_cursor(1);
            }
            InputEvent::Home => {
                self.pending.home();
            }
            InputEvent::End => {
                self.pending.end();
            }
            InputEvent::Enter => {
                let mut line = self.pending.submit();
                self.pending.reset();
                line.push('\n');
                return Some(line.into_bytes());
            }
            other => return other.to_bytes(),
        }
        None
    }
}

/// Output rows and columns inside a shell box placed at `rect`
fn output_area(rect: Rect) -> (u16, u16) {
    (rect.height.saturating_sub(3), rect.width.saturating_sub(2))
}

impl Widget for ShellBox {
    fn base(&self) -> &PanelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }

    fn preferred_size(&self, parent: Bounds) -> (u16, u16) {
        (parent.height.saturating_sub(2), parent.width.saturating_sub(2))
    }

    fn draw(&self, surface: &mut Surface) -> Option<(u16, u16)> {
        self.base.draw_chrome(surface);
        let rect = surface.rect();
        let (rows, cols) = output_area(rect);
        for (i, line) in self.scrollback.visible(rows as usize).into_iter().enumerate() {
            let text: String = line.chars().take(cols as usize).collect();
            surface.write_text(1 + i as u16, 1, &text, Attr::Normal);
        }

        let row = rect.height.saturating_sub(2);
        surface.write_text(row, 1, PROMPT, Attr::Bold);
        let field_col = 1 + PROMPT.len() as u16;
        let width = rect.width.saturating_sub(field_col + 1);
        Some(self.draw_field(surface, row, field_col, width))
    }

    fn shows_cursor(&self) -> bool {
        true
    }
}

impl HasTextField for ShellBox {
    fn field(&self) -> &LineEdit {
        &self.pending
    }
}
