//! Single-line text entry box

use tracing::debug;

use crate::canvas::Canvas;
use crate::error::Result;
use crate::input::InputEvent;
use crate::screen::Surface;
use crate::settings::Settings;
use crate::ui::geometry::Bounds;
use crate::ui::line_edit::LineEdit;
use crate::ui::panel::{run_modal, Dialog, EventResult, HasTextField, PanelBase, Widget};

/// Pop-up text field. Enter returns the text; input past the length cap is
/// dropped without complaint.
pub struct InputBox {
    base: PanelBase,
    edit: LineEdit,
}

impl InputBox {
    pub fn new(title: impl Into<String>, default: &str, max_len: usize) -> Self {
        Self {
            base: PanelBase::new(title, ""),
            edit: LineEdit::new(default, max_len),
        }
    }

    /// Message lines shown above the field
    pub fn with_message(mut self, message: &str) -> Self {
        self.base = PanelBase::new(self.base.title().to_string(), message);
        self
    }

    pub fn value(&self) -> String {
        self.edit.value()
    }

    /// Insert `text` at the cursor, skipping control characters.
    /// Returns how many characters went in.
    pub fn paste(&mut self, text: &str) -> usize {
        text.chars()
            .filter(|ch| !ch.is_control())
            .take_while(|&ch| self.edit.insert(ch))
            .count()
    }

    fn paste_clipboard(&mut self) -> EventResult<String> {
        let text = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text());
        match text {
            Ok(text) => {
                let inserted = self.paste(&text);
                debug!(inserted, "pasted from clipboard");
                EventResult::Consumed
            }
            Err(err) => {
                debug!(%err, "clipboard unavailable");
                EventResult::Ignored
            }
        }
    }

    pub fn show(&mut self, canvas: &mut Canvas) -> Result<String> {
        run_modal(canvas, self)
    }

    fn field_row(&self) -> u16 {
        1 + self.base.lines().len() as u16
    }
}

impl Widget for InputBox {
    fn base(&self) -> &PanelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }

    fn preferred_size(&self, _parent: Bounds) -> (u16, u16) {
        // one spare cell so the cursor can sit after a full field
        let field = self.edit.max_len().saturating_add(1).min(u16::MAX as usize) as u16;
        let interior = self.base.content_width().max(field);
        let height = (self.base.lines().len() as u16).saturating_add(3);
        (height, interior.saturating_add(2))
    }

    fn draw(&self, surface: &mut Surface) -> Option<(u16, u16)> {
        self.base.draw_chrome(surface);
        let width = surface.rect().width.saturating_sub(2);
        Some(self.draw_field(surface, self.field_row(), 1, width))
    }

    fn shows_cursor(&self) -> bool {
        true
    }
}

impl HasTextField for InputBox {
    fn field(&self) -> &LineEdit {
        &self.edit
    }
}

impl Dialog for InputBox {
    type Output = String;

    fn handle_event(&mut self, event: &InputEvent, _settings: &Settings) -> EventResult<String> {
        let changed = match event {
            InputEvent::Char(ch) => self.edit.insert(*ch),
            InputEvent::Backspace => self.edit.backspace(),
            InputEvent::Delete => self.edit.delete_forward(),
            InputEvent::CursorLeft => self.edit.move_cursor(-1),
            InputEvent::CursorRight => self.edit.move_cursor(1),
            InputEvent::Home => self.edit.home(),
            InputEvent::End => self.edit.end(),
            InputEvent::Ctrl('v') => return self.paste_clipboard(),
            InputEvent::Enter => return EventResult::Done(self.edit.submit()),
            _ => return EventResult::Ignored,
        };
        if !changed {
            debug!(?event, "edit rejected");
        }
        EventResult::Consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::{Attr, Key};
    use crate::testing::{scripted, typed};

    #[test]
    fn test_typing_past_cap_is_dropped() {
        let mut keys = typed("cdef");
        keys.push(Key::Enter);
        let (mut canvas, _rec) = scripted(Bounds::new(24, 80), keys);
        let value = InputBox::new("Name", "ab", 5).show(&mut canvas).unwrap();
        assert_eq!(value, "abcde");
    }

    #[test]
    fn test_editing_keys() {
        let mut keys = vec![Key::Home, Key::Delete, Key::End, Key::Backspace, Key::Left];
        keys.extend(typed("X"));
        keys.push(Key::Enter);
        let (mut canvas, _rec) = scripted(Bounds::new(24, 80), keys);
        let value = InputBox::new("Name", "hello", 10).show(&mut canvas).unwrap();
        assert_eq!(value, "elXl");
    }

    #[test]
    fn test_field_and_cursor_are_drawn() {
        let (mut canvas, rec) = scripted(Bounds::new(24, 80), vec![Key::Left, Key::Enter]);
        InputBox::new("Name", "ab", 5).show(&mut canvas).unwrap();

        let frames = rec.frames();
        let first = &frames[0];
        let (row, col) = first.find("ab    ").unwrap();
        assert_eq!(first.attr(row, col), Attr::Reverse);
        assert_eq!(first.cursor, Some((row as u16, col as u16 + 2)));
        assert_eq!(frames[1].cursor, Some((row as u16, col as u16 + 1)));
        assert_eq!(rec.last_frame().cursor, None);
    }

    #[test]
    fn test_paste_respects_cap_and_skips_controls() {
        let mut input = InputBox::new("Name", "", 4);
        assert_eq!(input.paste("a\nb\tcdef"), 4);
        assert_eq!(input.value(), "abcd");
    }

    #[test]
    fn test_message_lines_push_field_down() {
        let input = InputBox::new("Name", "", 4).with_message("Who are you?");
        assert_eq!(input.preferred_size(Bounds::new(24, 80)), (4, 14));
        assert_eq!(input.field_row(), 2);
    }
}
