//! Yes/No confirmation box

use crate::canvas::Canvas;
use crate::error::Result;
use crate::input::InputEvent;
use crate::screen::Surface;
use crate::settings::Settings;
use crate::ui::geometry::Bounds;
use crate::ui::panel::{run_modal, Dialog, EventResult, HasButtons, PanelBase, Widget};
use crate::ui::toggle::ToggleGroup;

use super::message_box::{button_box_size, button_row};

const YES: usize = 0;
const NO: usize = 1;

/// Message box with YES and NO buttons. NO is selected unless told otherwise.
pub struct YesNoBox {
    base: PanelBase,
    choice: ToggleGroup,
}

impl YesNoBox {
    pub fn new(title: impl Into<String>, message: &str) -> Self {
        Self {
            base: PanelBase::new(title, message),
            choice: ToggleGroup::exclusive(["YES", "NO"], NO),
        }
    }

    pub fn with_default(mut self, yes: bool) -> Self {
        self.choice.toggle(if yes { YES } else { NO });
        self
    }

    /// Whether YES is currently selected
    pub fn is_yes(&self) -> bool {
        self.choice.is_selected(YES)
    }

    pub fn show(&mut self, canvas: &mut Canvas) -> Result<bool> {
        run_modal(canvas, self)
    }
}

impl Widget for YesNoBox {
    fn base(&self) -> &PanelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }

    fn preferred_size(&self, _parent: Bounds) -> (u16, u16) {
        button_box_size(&self.base)
    }

    fn draw(&self, surface: &mut Surface) -> Option<(u16, u16)> {
        self.base.draw_chrome(surface);
        let row = button_row(surface);
        self.draw_buttons(surface, row);
        None
    }
}

impl HasButtons for YesNoBox {
    fn buttons(&self) -> &ToggleGroup {
        &self.choice
    }
}

impl Dialog for YesNoBox {
    type Output = bool;

    fn handle_event(&mut self, event: &InputEvent, _settings: &Settings) -> EventResult<bool> {
        match event {
            InputEvent::CursorLeft | InputEvent::CursorRight | InputEvent::CursorUp | InputEvent::CursorDown => {
                self.choice.flip();
                EventResult::Consumed
            }
            InputEvent::Char('y' | 'Y') => {
                self.choice.toggle(YES);
                EventResult::Done(true)
            }
            InputEvent::Char('n' | 'N') => {
                self.choice.toggle(NO);
                EventResult::Done(false)
            }
            InputEvent::Enter => EventResult::Done(self.is_yes()),
            _ => EventResult::Ignored,
        }
    }
}
