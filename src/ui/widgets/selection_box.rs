//! Radio and checkbox selection lists with OK/Cancel
//!
//! Both boxes share one [`SelectionList`]: the list toggles, a highlight
//! over them, and an exclusive OK/Cancel pair. The radio box moves its
//! selection with the highlight; the checkbox box only changes selection
//! on the activate key.

use crate::canvas::Canvas;
use crate::error::Result;
use crate::input::InputEvent;
use crate::screen::Surface;
use crate::settings::Settings;
use crate::ui::geometry::Bounds;
use crate::ui::panel::{run_modal, Dialog, EventResult, HasButtons, HasToggleList, PanelBase, Widget};
use crate::ui::toggle::{Discipline, Highlight, ToggleGroup};

const OK: usize = 0;

/// How a selection dialog ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Confirmed,
    Cancelled,
}

/// Answer of a [`MultiSelectionBox`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultiSelection {
    /// Checked labels in list order; may be empty on a confirmed answer
    pub selected: Vec<String>,
    pub cancelled: bool,
}

struct SelectionList {
    base: PanelBase,
    items: ToggleGroup,
    highlight: Highlight,
    buttons: ToggleGroup,
}

impl SelectionList {
    fn new(title: String, message: &str, items: ToggleGroup) -> Self {
        let highlight = Highlight::new(items.len());
        Self {
            base: PanelBase::new(title, message),
            items,
            highlight,
            buttons: ToggleGroup::exclusive(["OK", "Cancel"], OK),
        }
    }

    /// Radio lists carry the selection along with the highlight
    fn coupled(&self) -> bool {
        self.items.discipline() == Discipline::Exclusive
    }

    fn move_highlight(&mut self, delta: isize) {
        let index = self.highlight.move_by(delta);
        if self.coupled() {
            self.items.toggle(index);
        }
    }

    fn preferred_size(&self, parent: Bounds) -> (u16, u16) {
        let label = self
            .items
            .items()
            .iter()
            .map(|t| t.label.chars().count() + 4)
            .max()
            .unwrap_or(0)
            .min(u16::MAX as usize) as u16;
        let buttons = self
            .buttons
            .items()
            .iter()
            .map(|t| t.label.chars().count() as u16 + 2)
            .sum::<u16>()
            + 1;
        let interior = self.base.content_width().max(label).max(buttons);

        let lines = self.base.lines().len() as u16;
        let room = parent.height.saturating_sub(lines + 5);
        let rows = (self.items.len().min(u16::MAX as usize) as u16).min(room).max(1);
        (lines + rows + 3, interior.saturating_add(2))
    }

    fn list_rows(&self, surface: &Surface) -> u16 {
        let lines = self.base.lines().len() as u16;
        surface.rect().height.saturating_sub(lines + 3).max(1)
    }

    fn draw(&self, surface: &mut Surface) {
        self.base.draw_chrome(surface);
        let top = 1 + self.base.lines().len() as u16;
        let rows = self.list_rows(surface);
        self.draw_list(surface, top, rows);
        let row = surface.rect().height.saturating_sub(2);
        self.draw_buttons(surface, row);
    }

    fn handle_event(&mut self, event: &InputEvent, settings: &Settings) -> EventResult<Outcome> {
        match event {
            InputEvent::CursorUp => self.move_highlight(-1),
            InputEvent::CursorDown => self.move_highlight(1),
            InputEvent::Home => self.move_highlight(-(self.items.len() as isize)),
            InputEvent::End => self.move_highlight(self.items.len() as isize),
            InputEvent::CursorLeft | InputEvent::CursorRight | InputEvent::Tab | InputEvent::ShiftTab => {
                self.buttons.flip()
            }
            InputEvent::Char(ch) if *ch == settings.activate_key => {
                self.items.toggle(self.highlight.index());
            }
            InputEvent::Escape => return EventResult::Done(Outcome::Cancelled),
            InputEvent::Enter => {
                let outcome = if self.buttons.is_selected(OK) {
                    Outcome::Confirmed
                } else {
                    Outcome::Cancelled
                };
                return EventResult::Done(outcome);
            }
            _ => return EventResult::Ignored,
        }
        EventResult::Consumed
    }
}

impl HasToggleList for SelectionList {
    fn list(&self) -> &ToggleGroup {
        &self.items
    }

    fn highlight(&self) -> &Highlight {
        &self.highlight
    }
}

impl HasButtons for SelectionList {
    fn buttons(&self) -> &ToggleGroup {
        &self.buttons
    }
}

/// Radio list: exactly one item is selected, starting with the first
pub struct SingleSelectionBox {
    inner: SelectionList,
}

impl SingleSelectionBox {
    pub fn new<S: Into<String>>(
        title: impl Into<String>,
        message: &str,
        items: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            inner: SelectionList::new(title.into(), message, ToggleGroup::exclusive(items, 0)),
        }
    }

    /// The selected label, or `None` if cancelled
    pub fn show(&mut self, canvas: &mut Canvas) -> Result<Option<String>> {
        run_modal(canvas, self)
    }
}

/// Checkbox list: any subset may be checked, starting with none
pub struct MultiSelectionBox {
    inner: SelectionList,
}

impl MultiSelectionBox {
    pub fn new<S: Into<String>>(
        title: impl Into<String>,
        message: &str,
        items: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            inner: SelectionList::new(title.into(), message, ToggleGroup::independent(items)),
        }
    }

    pub fn show(&mut self, canvas: &mut Canvas) -> Result<MultiSelection> {
        run_modal(canvas, self)
    }
}

macro_rules! selection_widget {
    ($ty:ty) => {
        impl Widget for $ty {
            fn base(&self) -> &PanelBase {
                &self.inner.base
            }

            fn base_mut(&mut self) -> &mut PanelBase {
                &mut self.inner.base
            }

            fn preferred_size(&self, parent: Bounds) -> (u16, u16) {
                self.inner.preferred_size(parent)
            }

            fn draw(&self, surface: &mut Surface) -> Option<(u16, u16)> {
                self.inner.draw(surface);
                None
            }
        }
    };
}

selection_widget!(SingleSelectionBox);
selection_widget!(MultiSelectionBox);

impl Dialog for SingleSelectionBox {
    type Output = Option<String>;

    fn handle_event(&mut self, event: &InputEvent, settings: &Settings) -> EventResult<Option<String>> {
        match self.inner.handle_event(event, settings) {
            EventResult::Done(Outcome::Confirmed) => {
                EventResult::Done(self.inner.items.selected_label().map(str::to_string))
            }
            EventResult::Done(Outcome::Cancelled) => EventResult::Done(None),
            EventResult::Consumed => EventResult::Consumed,
            EventResult::Ignored => EventResult::Ignored,
            EventResult::Flash => EventResult::Flash,
        }
    }
}

impl Dialog for MultiSelectionBox {
    type Output = MultiSelection;

    fn handle_event(&mut self, event: &InputEvent, settings: &Settings) -> EventResult<MultiSelection> {
        match self.inner.handle_event(event, settings) {
            EventResult::Done(Outcome::Confirmed) => EventResult::Done(MultiSelection {
                selected: self.inner.items.selected_labels(),
                cancelled: false,
            }),
            EventResult::Done(Outcome::Cancelled) => EventResult::Done(MultiSelection {
                selected: Vec::new(),
                cancelled: true,
            }),
            EventResult::Consumed => EventResult::Consumed,
            EventResult::Ignored => EventResult::Ignored,
            EventResult::Flash => EventResult::Flash,
        }
    }
}
