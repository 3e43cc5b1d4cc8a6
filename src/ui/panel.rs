//! Panel widget base: chrome, capabilities and the modal loop
//!
//! Each concrete dialog is a small struct holding a [`PanelBase`] plus
//! whichever capabilities it needs ([`HasButtons`], [`HasTextField`],
//! [`HasToggleList`]). Key handling (`Dialog::handle_event`) only changes
//! state; drawing (`Widget::draw`) only reads it. The loop in [`step`]
//! alternates the two.

use std::thread;

use tracing::{debug, trace};

use crate::canvas::{Canvas, ModalSession};
use crate::error::Result;
use crate::input::InputEvent;
use crate::screen::Surface;
use crate::settings::Settings;
use crate::terminal::Attr;
use crate::ui::geometry::{self, Bounds, Rect};
use crate::ui::line_edit::LineEdit;
use crate::ui::toggle::{Discipline, Highlight, ToggleGroup};

/// Result of handling an event
#[derive(Clone, Debug, PartialEq)]
pub enum EventResult<T> {
    /// Event changed (or deliberately kept) the dialog's state
    Consumed,
    /// Event means nothing to this dialog
    Ignored,
    /// Show the current state briefly, then call `Dialog::release`
    Flash,
    /// The dialog is finished
    Done(T),
}

/// Title, message and placement shared by every panel
#[derive(Clone, Debug, Default)]
pub struct PanelBase {
    title: String,
    lines: Vec<String>,
    offset: (i32, i32),
}

impl PanelBase {
    pub fn new(title: impl Into<String>, message: &str) -> Self {
        Self {
            title: title.into(),
            lines: message.lines().map(str::to_string).collect(),
            offset: (0, 0),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Interior width needed for the title (plus one cell) and message
    pub fn content_width(&self) -> u16 {
        let title = self.title.chars().count() + 1;
        let widest = self.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        title.max(widest).min(u16::MAX as usize) as u16
    }

    /// Centered rect shifted by the panel's offset, clamped to `parent`
    pub fn place(&self, parent: Bounds, height: u16, width: u16) -> Result<Rect> {
        let centered = geometry::center(parent, height, width)?;
        Ok(geometry::adjust(centered, self.offset.0, self.offset.1, parent))
    }

    /// Move the panel by a delta; the stored offset keeps what the clamp allowed
    pub fn nudge(&mut self, dy: i32, dx: i32, parent: Bounds, height: u16, width: u16) -> Result<Rect> {
        let centered = geometry::center(parent, height, width)?;
        let current = geometry::adjust(centered, self.offset.0, self.offset.1, parent);
        let moved = geometry::adjust(current, dy, dx, parent);
        self.offset = (
            moved.top as i32 - centered.top as i32,
            moved.left as i32 - centered.left as i32,
        );
        Ok(moved)
    }

    /// Put the panel's top-left corner at (top, left), clamped
    pub fn move_to(&mut self, top: u16, left: u16, parent: Bounds, height: u16, width: u16) -> Result<Rect> {
        let current = self.place(parent, height, width)?;
        let dy = top as i32 - current.top as i32;
        let dx = left as i32 - current.left as i32;
        self.nudge(dy, dx, parent, height, width)
    }

    /// Back to the center
    pub fn recenter(&mut self) {
        self.offset = (0, 0);
    }

    /// Border, emphasized title on the top edge, plain message lines below
    pub fn draw_chrome(&self, surface: &mut Surface) {
        surface.draw_border();
        let width = surface.rect().width.saturating_sub(2) as usize;
        let title: String = self.title.chars().take(width).collect();
        surface.write_text(0, 1, &title, Attr::Bold);
        for (i, line) in self.lines.iter().enumerate() {
            let text: String = line.chars().take(width).collect();
            surface.write_text(1 + i as u16, 1, &text, Attr::Normal);
        }
    }
}

/// Something that can be laid out and drawn on a panel
pub trait Widget {
    fn base(&self) -> &PanelBase;

    fn base_mut(&mut self) -> &mut PanelBase;

    /// Outer (height, width) wanted on a parent of the given size
    fn preferred_size(&self, parent: Bounds) -> (u16, u16);

    /// Draw into a cleared surface. Returns where the cursor belongs, if
    /// the widget shows one.
    fn draw(&self, surface: &mut Surface) -> Option<(u16, u16)>;

    fn shows_cursor(&self) -> bool {
        false
    }

    /// Where the panel goes on `parent`
    fn layout(&self, parent: Bounds) -> Result<Rect> {
        let (height, width) = self.preferred_size(parent);
        self.base().place(parent, height, width)
    }

    /// Move the panel by (dy, dx) on `parent`, clamped to its edges
    fn nudge(&mut self, dy: i32, dx: i32, parent: Bounds) -> Result<Rect> {
        let (height, width) = self.preferred_size(parent);
        self.base_mut().nudge(dy, dx, parent, height, width)
    }
}

/// A widget with a key-driven state machine and a typed result
pub trait Dialog: Widget {
    type Output;

    fn handle_event(&mut self, event: &InputEvent, settings: &Settings) -> EventResult<Self::Output>;

    /// End of a flash
    fn release(&mut self) {}
}

/// Row of exclusive buttons drawn right-aligned
pub trait HasButtons {
    fn buttons(&self) -> &ToggleGroup;

    /// Draw every button as deselected (used for flashing)
    fn buttons_dimmed(&self) -> bool {
        false
    }

    fn draw_buttons(&self, surface: &mut Surface, row: u16) {
        let group = self.buttons();
        let total: usize = group.items().iter().map(|b| b.label.chars().count() + 2).sum();
        let width = surface.rect().width as usize;
        let mut col = width.saturating_sub(2).saturating_sub(total).max(1) as u16;
        for button in group.items() {
            let text = format!(" {} ", button.label);
            let attr = Attr::selection(button.selected && !self.buttons_dimmed());
            surface.write_text(row, col, &text, attr);
            col = col.saturating_add(text.chars().count() as u16);
        }
    }
}

/// Single-line text field backed by a [`LineEdit`]
pub trait HasTextField {
    fn field(&self) -> &LineEdit;

    /// Draw the field reverse-highlighted, `width` cells wide, at (row, col).
    /// Returns the cursor cell.
    fn draw_field(&self, surface: &mut Surface, row: u16, col: u16, width: u16) -> (u16, u16) {
        let (text, cursor) = self.field().window(width as usize);
        surface.write_text(row, col, &text, Attr::Reverse);
        (row, col + cursor as u16)
    }
}

/// List of toggles with a highlight cursor
pub trait HasToggleList {
    fn list(&self) -> &ToggleGroup;

    fn highlight(&self) -> &Highlight;

    /// First list index visible when `rows` rows are available
    fn scroll_top(&self, rows: u16) -> usize {
        let rows = rows.max(1) as usize;
        self.highlight().index().saturating_sub(rows - 1)
    }

    fn draw_list(&self, surface: &mut Surface, top_row: u16, rows: u16) {
        let (open, close, mark) = match self.list().discipline() {
            Discipline::Exclusive => ('(', ')', 'o'),
            Discipline::Independent => ('[', ']', 'X'),
        };
        let width = surface.rect().width.saturating_sub(2) as usize;
        let first = self.scroll_top(rows);
        for (offset, item) in self.list().items().iter().skip(first).take(rows as usize).enumerate() {
            let index = first + offset;
            let text = format!(
                "{}{}{} {}",
                open,
                if item.selected { mark } else { ' ' },
                close,
                item.label
            );
            let text: String = text.chars().take(width).collect();
            let attr = Attr::selection(index == self.highlight().index());
            surface.write_text(top_row + offset as u16, 1, &text, attr);
        }
    }
}

/// Lay out, clear and draw `widget` on the session's panel, then present
pub fn draw<W: Widget + ?Sized>(session: &mut ModalSession<'_>, widget: &W) -> Result<Rect> {
    let parent = session.bounds();
    let rect = widget.layout(parent)?;
    session.place(rect);
    let surface = session.surface();
    surface.clear();
    if let Some((row, col)) = widget.draw(surface) {
        session.set_cursor(row, col);
    }
    session.present()?;
    Ok(rect)
}

/// One loop iteration: draw, block for a key, dispatch it
pub fn step<D: Dialog + ?Sized>(session: &mut ModalSession<'_>, dialog: &mut D) -> Result<Option<D::Output>> {
    draw(session, dialog)?;
    let Some(event) = session.read_event(None)? else {
        return Ok(None);
    };
    let settings = session.settings().clone();
    match dialog.handle_event(&event, &settings) {
        EventResult::Done(output) => Ok(Some(output)),
        EventResult::Consumed => Ok(None),
        EventResult::Ignored => {
            trace!(?event, "event ignored");
            Ok(None)
        }
        EventResult::Flash => {
            draw(session, dialog)?;
            thread::sleep(settings.flash_duration);
            dialog.release();
            Ok(None)
        }
    }
}

/// Show `dialog` on top of `canvas` until it completes.
///
/// Nothing is drawn if the canvas cannot hold the dialog at all.
pub fn run_modal<D: Dialog + ?Sized>(canvas: &mut Canvas, dialog: &mut D) -> Result<D::Output> {
    let rect = dialog.layout(canvas.bounds())?;
    let mut session = ModalSession::open(canvas, rect, dialog.shows_cursor());
    debug!(title = dialog.base().title(), "dialog opened");
    loop {
        if let Some(output) = step(&mut session, dialog)? {
            debug!(title = dialog.base().title(), "dialog completed");
            return Ok(output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Buttons(ToggleGroup, bool);

    impl HasButtons for Buttons {
        fn buttons(&self) -> &ToggleGroup {
            &self.0
        }

        fn buttons_dimmed(&self) -> bool {
            self.1
        }
    }

    #[test]
    fn test_buttons_right_aligned() {
        let mut surface = Surface::new(Rect::new(0, 0, 4, 14));
        let row = Buttons(ToggleGroup::exclusive(["YES", "NO"], 1), false);
        row.draw_buttons(&mut surface, 2);
        assert_eq!(surface.row_text(2), "    YES  NO   ");
        assert_eq!(surface.get(2, 9).unwrap().attr, Attr::Reverse);
        assert_eq!(surface.get(2, 4).unwrap().attr, Attr::Normal);

        let dimmed = Buttons(ToggleGroup::exclusive(["OK"], 0), true);
        dimmed.draw_buttons(&mut surface, 1);
        assert_eq!(surface.get(1, 9).unwrap().attr, Attr::Normal);
    }

    #[test]
    fn test_chrome_truncates_to_interior() {
        let base = PanelBase::new("A long title", "first line\nsecond");
        let mut surface = Surface::new(Rect::new(0, 0, 4, 8));
        base.draw_chrome(&mut surface);
        assert_eq!(surface.row_text(0), "┌A long┐");
        assert_eq!(surface.row_text(1), "│first │");
        assert_eq!(surface.row_text(2), "│second│");
        assert_eq!(surface.get(0, 1).unwrap().attr, Attr::Bold);
    }

    #[test]
    fn test_layout_follows_parent_resize() {
        use crate::terminal::Key;
        use crate::testing::scripted;
        use crate::ui::widgets::MessageBox;

        let (mut canvas, rec) = scripted(Bounds::new(10, 40), vec![Key::Char('x')]);
        let mut dialog = MessageBox::new("Note", "hi");
        let rect = dialog.layout(canvas.bounds()).unwrap();
        let mut session = ModalSession::open(&mut canvas, rect, false);
        assert_eq!(step(&mut session, &mut dialog).unwrap(), None);
        assert_eq!(rec.last_frame().find("┌Note"), Some((3, 14)));

        rec.set_bounds(Bounds::new(20, 60));
        rec.push_key(Key::Enter);
        assert_eq!(step(&mut session, &mut dialog).unwrap(), Some(()));
        let resized = rec.last_frame();
        assert_eq!(resized.cells.len(), 20);
        assert_eq!(resized.find("┌Note"), Some((8, 24)));
    }

    #[test]
    fn test_nudge_is_clamped_and_remembered() {
        let parent = Bounds::new(24, 80);
        let mut base = PanelBase::new("t", "");
        let r = base.nudge(-100, 3, parent, 4, 20).unwrap();
        assert_eq!((r.top, r.left), (0, 33));
        assert_eq!(base.place(parent, 4, 20).unwrap(), r);
        let r = base.move_to(50, 0, parent, 4, 20).unwrap();
        assert_eq!((r.top, r.left), (20, 0));
        base.recenter();
        assert_eq!(base.place(parent, 4, 20).unwrap(), Rect::new(10, 30, 4, 20));
    }
}
