//! The shared canvas and its panel stack
//!
//! Every visible dialog owns one surface on the stack; the screen is rebuilt
//! from the stack on each present, so a panel that leaves the stack leaves
//! nothing behind. Panels enter and leave through [`ModalSession`], whose
//! lifetime is tied to a mutable borrow of the canvas: the stack is strictly
//! last-in first-out and the newest session is always on top.

use std::io;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::input::InputEvent;
use crate::screen::{Screen, Surface};
use crate::settings::Settings;
use crate::terminal::Key;
use crate::ui::geometry::{Bounds, Rect};

/// The character-cell device the canvas draws on
pub trait Backend {
    /// Current size; queried again on every layout pass
    fn size(&mut self) -> Bounds;

    /// Read one key. `None` blocks; `Some(t)` gives up after `t`.
    fn read_key(&mut self, timeout: Option<Duration>) -> io::Result<Option<Key>>;

    /// Show the composed screen
    fn present(&mut self, screen: &mut Screen) -> io::Result<()>;
}

/// Stable identity of a panel, for logs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelId(u64);

struct Panel {
    id: PanelId,
    surface: Surface,
}

/// Parent surface for every dialog
pub struct Canvas {
    backend: Box<dyn Backend>,
    screen: Screen,
    panels: Vec<Panel>,
    next_id: u64,
    cursor_visible: bool,
    cursor: (u16, u16),
    settings: Settings,
}

impl Canvas {
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            screen: Screen::new(0, 0),
            panels: Vec::new(),
            next_id: 1,
            cursor_visible: false,
            cursor: (0, 0),
            settings: Settings::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current size of the parent surface
    pub fn bounds(&mut self) -> Bounds {
        self.backend.size()
    }

    /// Number of panels currently shown
    pub fn depth(&self) -> usize {
        self.panels.len()
    }

    /// Set the cursor visibility flag, returning the previous value
    pub fn set_cursor_visible(&mut self, visible: bool) -> bool {
        std::mem::replace(&mut self.cursor_visible, visible)
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Place the terminal cursor, in screen coordinates
    pub fn set_cursor_position(&mut self, row: u16, col: u16) {
        self.cursor = (row, col);
    }

    /// Read one key and translate it into an input event
    pub fn read_event(&mut self, timeout: Option<Duration>) -> Result<Option<InputEvent>> {
        match self.backend.read_key(timeout)? {
            Some(key) => {
                let event = InputEvent::from(key.clone());
                if event == InputEvent::Unknown {
                    trace!(?key, "unrecognised key");
                }
                Ok(Some(event))
            }
            None => Ok(None),
        }
    }

    /// Rebuild the screen from the panel stack and hand it to the backend
    pub fn present(&mut self) -> Result<()> {
        let bounds = self.backend.size();
        self.compose(bounds);
        self.backend.present(&mut self.screen)?;
        Ok(())
    }

    fn compose(&mut self, bounds: Bounds) {
        if self.screen.size() != (bounds.width, bounds.height) {
            debug!(height = bounds.height, width = bounds.width, "canvas resized");
            self.screen.resize(bounds.width, bounds.height);
        }
        self.screen.clear();
        for panel in &self.panels {
            self.screen.blit(&panel.surface);
        }
        self.screen.set_cursor_visible(self.cursor_visible);
        let (row, col) = self.cursor;
        self.screen.set_cursor(
            row.min(bounds.height.saturating_sub(1)),
            col.min(bounds.width.saturating_sub(1)),
        );
    }

    /// Push a new panel on top of the stack, returning its depth
    fn push_panel(&mut self, rect: Rect) -> (usize, PanelId) {
        let id = PanelId(self.next_id);
        self.next_id += 1;
        self.panels.push(Panel {
            id,
            surface: Surface::new(rect),
        });
        (self.panels.len() - 1, id)
    }

    /// Drop every panel at `depth` and above
    fn pop_panels(&mut self, depth: usize) {
        self.panels.truncate(depth);
    }
}

/// A dialog's claim on the canvas: one panel on top of the stack.
///
/// Opening raises a fresh, cleared panel and sets the cursor visibility the
/// dialog wants. Dropping the session (normal return, `?`, or unwinding)
/// removes the panel, restores the previous cursor visibility and redraws
/// whatever was underneath. Dereferences to the canvas so nested dialogs
/// can be opened from inside.
pub struct ModalSession<'c> {
    canvas: &'c mut Canvas,
    depth: usize,
    id: PanelId,
    saved_cursor: bool,
}

impl<'c> ModalSession<'c> {
    pub fn open(canvas: &'c mut Canvas, rect: Rect, show_cursor: bool) -> Self {
        let (depth, id) = canvas.push_panel(rect);
        let saved_cursor = canvas.set_cursor_visible(show_cursor);
        debug!(?id, depth, ?rect, "panel shown");
        Self {
            canvas,
            depth,
            id,
            saved_cursor,
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    /// The surface this session draws on
    pub fn surface(&mut self) -> &mut Surface {
        &mut self.canvas.panels[self.depth].surface
    }

    /// Move or resize the panel
    pub fn place(&mut self, rect: Rect) {
        self.surface().place(rect);
    }

    /// Place the cursor at (row, col) inside this panel
    pub fn set_cursor(&mut self, row: u16, col: u16) {
        let rect = self.surface().rect();
        self.canvas
            .set_cursor_position(rect.top.saturating_add(row), rect.left.saturating_add(col));
    }
}

impl Deref for ModalSession<'_> {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        self.canvas
    }
}

impl DerefMut for ModalSession<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        self.canvas
    }
}

impl Drop for ModalSession<'_> {
    fn drop(&mut self) {
        self.canvas.pop_panels(self.depth);
        self.canvas.set_cursor_visible(self.saved_cursor);
        debug!(id = ?self.id, depth = self.depth, "panel hidden");
        if let Err(err) = self.canvas.present() {
            warn!(%err, "redraw after closing panel failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::Attr;
    use crate::testing::scripted;

    #[test]
    fn test_closed_panel_leaves_no_glyphs() {
        let (mut canvas, rec) = scripted(Bounds::new(6, 20), vec![]);
        canvas.present().unwrap();
        let blank = rec.last_frame();
        {
            let mut session = ModalSession::open(&mut canvas, Rect::new(1, 2, 3, 10), false);
            session.surface().draw_border();
            session.surface().write_text(1, 1, "hello", Attr::Bold);
            session.present().unwrap();
            assert_eq!(rec.last_frame().row(2), "  │hello   │        ");
        }
        assert_eq!(canvas.depth(), 0);
        assert_eq!(rec.last_frame(), blank);
    }

    #[test]
    fn test_nested_sessions_restore_cursor_and_stack() {
        let (mut canvas, rec) = scripted(Bounds::new(10, 30), vec![]);
        let mut outer = ModalSession::open(&mut canvas, Rect::new(0, 0, 10, 30), false);
        outer.surface().write_text(5, 0, "outer", Attr::Normal);
        {
            let mut inner = ModalSession::open(&mut outer, Rect::new(4, 0, 3, 10), true);
            inner.surface().write_text(1, 0, "inner", Attr::Normal);
            inner.present().unwrap();
            assert!(inner.cursor_visible());
            assert_eq!(inner.depth(), 2);
            assert_eq!(rec.last_frame().row(5), format!("{:30}", "inner"));
        }
        assert!(!outer.cursor_visible());
        assert_eq!(outer.depth(), 1);
        assert_eq!(rec.last_frame().row(5), format!("{:30}", "outer"));
    }

    #[test]
    fn test_session_closes_on_error_path() {
        fn failing(canvas: &mut Canvas) -> Result<()> {
            let _session = ModalSession::open(canvas, Rect::new(0, 0, 2, 2), true);
            Err(crate::error::Error::Aborted)
        }
        let (mut canvas, _rec) = scripted(Bounds::new(5, 5), vec![]);
        assert!(failing(&mut canvas).is_err());
        assert_eq!(canvas.depth(), 0);
        assert!(!canvas.cursor_visible());
    }

    #[test]
    fn test_panel_ids_are_unique() {
        let (mut canvas, _rec) = scripted(Bounds::new(5, 5), vec![]);
        let first = ModalSession::open(&mut canvas, Rect::new(0, 0, 1, 1), false).id();
        let second = ModalSession::open(&mut canvas, Rect::new(0, 0, 1, 1), false).id();
        assert_ne!(first, second);
    }
}
