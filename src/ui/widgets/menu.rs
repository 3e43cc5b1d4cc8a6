//! Full-screen numbered menu

use std::fmt;

use tracing::info;

use crate::canvas::{Canvas, ModalSession};
use crate::error::Result;
use crate::input::InputEvent;
use crate::screen::Surface;
use crate::settings::Settings;
use crate::terminal::Attr;
use crate::ui::geometry::Bounds;
use crate::ui::panel::{step, Dialog, EventResult, PanelBase, Widget};
use crate::ui::toggle::Highlight;

/// First row used by entries, below the title and subtitle
const ENTRY_ROW: u16 = 3;

/// What choosing an entry does
pub enum MenuAction<'a> {
    /// Run the callback, then come back to the menu
    Run(Box<dyn FnMut(&mut Canvas) -> Result<()> + 'a>),
    /// Leave the menu
    Exit,
}

impl fmt::Debug for MenuAction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::Run(_) => f.write_str("Run(..)"),
            MenuAction::Exit => f.write_str("Exit"),
        }
    }
}

#[derive(Debug)]
pub struct MenuEntry<'a> {
    pub label: String,
    pub action: MenuAction<'a>,
}

impl<'a> MenuEntry<'a> {
    /// Entry whose callback may open further dialogs on the canvas it gets
    pub fn new(label: impl Into<String>, action: impl FnMut(&mut Canvas) -> Result<()> + 'a) -> Self {
        Self {
            label: label.into(),
            action: MenuAction::Run(Box::new(action)),
        }
    }

    /// Entry that closes the menu
    pub fn exit(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: MenuAction::Exit,
        }
    }
}

/// Borderless menu covering the whole canvas.
///
/// Up/Down move the highlight, digits 1-9 jump to an entry and Enter
/// chooses it. The menu stays on screen underneath anything its actions
/// open.
pub struct Menu<'a> {
    base: PanelBase,
    subtitle: String,
    entries: Vec<MenuEntry<'a>>,
    highlight: Highlight,
}

impl<'a> Menu<'a> {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>, entries: Vec<MenuEntry<'a>>) -> Self {
        let highlight = Highlight::new(entries.len());
        Self {
            base: PanelBase::new(title, ""),
            subtitle: subtitle.into(),
            entries,
            highlight,
        }
    }

    pub fn highlighted(&self) -> usize {
        self.highlight.index()
    }

    /// Run the menu until an exit entry is chosen. An error from an action
    /// closes the menu and is passed on.
    pub fn show(&mut self, canvas: &mut Canvas) -> Result<()> {
        let rect = self.layout(canvas.bounds())?;
        let mut session = ModalSession::open(canvas, rect, false);
        loop {
            let Some(index) = step(&mut session, self)? else {
                continue;
            };
            let Some(entry) = self.entries.get_mut(index) else {
                continue;
            };
            match &mut entry.action {
                MenuAction::Exit => {
                    info!(entry = %entry.label, "menu closed");
                    return Ok(());
                }
                MenuAction::Run(action) => {
                    info!(entry = %entry.label, "menu action");
                    action(&mut *session)?;
                }
            }
        }
    }
}

impl Widget for Menu<'_> {
    fn base(&self) -> &PanelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }

    fn preferred_size(&self, parent: Bounds) -> (u16, u16) {
        (parent.height, parent.width)
    }

    fn draw(&self, surface: &mut Surface) -> Option<(u16, u16)> {
        surface.write_text(0, 0, self.base.title(), Attr::Bold);
        surface.write_text(1, 0, &self.subtitle, Attr::Underline);

        let rows = surface.rect().height.saturating_sub(ENTRY_ROW).max(1) as usize;
        let first = self.highlight.index().saturating_sub(rows - 1);
        for (offset, entry) in self.entries.iter().enumerate().skip(first).take(rows) {
            let text = format!("{}. {}", offset + 1, entry.label);
            let attr = Attr::selection(offset == self.highlight.index());
            surface.write_text(ENTRY_ROW + (offset - first) as u16, 1, &text, attr);
        }
        None
    }
}

impl Dialog for Menu<'_> {
    /// Index of the chosen entry
    type Output = usize;

    fn handle_event(&mut self, event: &InputEvent, _settings: &Settings) -> EventResult<usize> {
        match event {
            InputEvent::CursorUp => {
                self.highlight.move_by(-1);
                EventResult::Consumed
            }
            InputEvent::CursorDown => {
                self.highlight.move_by(1);
                EventResult::Consumed
            }
            InputEvent::Enter => EventResult::Done(self.highlight.index()),
            _ => match event.digit() {
                Some(n @ 1..=9) if self.highlight.set(n as usize - 1) => EventResult::Consumed,
                _ => EventResult::Ignored,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::Error;
    use crate::terminal::Key;
    use crate::testing::scripted;
    use crate::ui::widgets::MessageBox;

    #[test]
    fn test_actions_run_and_nest() {
        let count = Cell::new(0);
        let keys = vec![
            Key::Enter,
            Key::Down,
            Key::Enter,
            Key::Enter,
            Key::Char('3'),
            Key::Enter,
        ];
        let (mut canvas, rec) = scripted(Bounds::new(12, 40), keys);
        let mut menu = Menu::new(
            "Demo",
            "Options",
            vec![
                MenuEntry::new("Count", |_canvas: &mut Canvas| {
                    count.set(count.get() + 1);
                    Ok(())
                }),
                MenuEntry::new("Say hi", |canvas: &mut Canvas| MessageBox::new("Hi", "there").show(canvas)),
                MenuEntry::exit("Quit"),
            ],
        );
        menu.show(&mut canvas).unwrap();

        assert_eq!(count.get(), 1);
        assert_eq!(rec.keys_left(), 0);
        assert_eq!(canvas.depth(), 0);
        let stacked = rec.frames().into_iter().find(|f| f.contains("there")).unwrap();
        assert!(stacked.contains("1. Count"));
        assert!(rec.last_frame().is_blank());
    }

    #[test]
    fn test_layout_and_highlight() {
        let (mut canvas, rec) = scripted(Bounds::new(12, 40), vec![Key::Down, Key::Enter]);
        let mut menu = Menu::new("Demo", "Options", vec![MenuEntry::exit("Stay"), MenuEntry::exit("Go")]);
        menu.show(&mut canvas).unwrap();

        let frames = rec.frames();
        let first = &frames[0];
        assert!(first.row(0).starts_with("Demo"));
        assert_eq!(first.attr(0, 0), Attr::Bold);
        assert_eq!(first.attr(1, 0), Attr::Underline);
        assert!(first.row(3).starts_with(" 1. Stay"));
        assert_eq!(first.attr(3, 1), Attr::Reverse);
        assert_eq!(frames[1].attr(3, 1), Attr::Normal);
        assert_eq!(frames[1].attr(4, 1), Attr::Reverse);
        assert_eq!(menu.highlighted(), 1);
    }

    #[test]
    fn test_digits_jump_and_clamp() {
        let entries = vec![MenuEntry::exit("a"), MenuEntry::exit("b"), MenuEntry::exit("c")];
        let mut menu = Menu::new("t", "s", entries);
        let settings = Settings::default();
        assert_eq!(menu.handle_event(&InputEvent::Char('3'), &settings), EventResult::Consumed);
        assert_eq!(menu.highlighted(), 2);
        assert_eq!(menu.handle_event(&InputEvent::Char('7'), &settings), EventResult::Ignored);
        assert_eq!(menu.handle_event(&InputEvent::Char('0'), &settings), EventResult::Ignored);
        assert_eq!(menu.handle_event(&InputEvent::CursorDown, &settings), EventResult::Consumed);
        assert_eq!(menu.highlighted(), 2);
        assert_eq!(menu.handle_event(&InputEvent::Enter, &settings), EventResult::Done(2));
    }

    #[test]
    fn test_action_error_closes_menu() {
        let (mut canvas, _rec) = scripted(Bounds::new(12, 40), vec![Key::Enter]);
        let mut menu = Menu::new(
            "Demo",
            "",
            vec![MenuEntry::new("Bail", |_canvas: &mut Canvas| Err(Error::Aborted))],
        );
        assert!(matches!(menu.show(&mut canvas), Err(Error::Aborted)));
        assert_eq!(canvas.depth(), 0);
    }

    #[test]
    fn test_scrolls_to_keep_highlight_visible() {
        let entries = (0..8).map(|i| MenuEntry::exit(format!("entry{i}"))).collect();
        let (mut canvas, rec) = scripted(Bounds::new(6, 30), vec![Key::Char('8'), Key::Enter]);
        Menu::new("t", "s", entries).show(&mut canvas).unwrap();

        let frames = rec.frames();
        assert!(frames[0].contains("1. entry0"));
        assert!(frames[1].contains("8. entry7"));
        assert!(!frames[1].contains("entry0"));
    }
}
