//! Message box: a title, a message and a single OK button

use crate::canvas::Canvas;
use crate::error::Result;
use crate::input::InputEvent;
use crate::screen::Surface;
use crate::settings::Settings;
use crate::ui::geometry::Bounds;
use crate::ui::panel::{run_modal, Dialog, EventResult, HasButtons, PanelBase, Widget};
use crate::ui::toggle::ToggleGroup;

/// Narrowest interior, so the button row always fits
pub(crate) const MIN_BUTTON_BOX_WIDTH: u16 = 9;

/// Outer size of a bordered box with message lines above one button row
pub(crate) fn button_box_size(base: &PanelBase) -> (u16, u16) {
    let interior = base.content_width().max(MIN_BUTTON_BOX_WIDTH);
    let lines = base.lines().len().max(1) as u16;
    (lines.saturating_add(3), interior.saturating_add(2))
}

/// Row of the buttons inside a box of the given height
pub(crate) fn button_row(surface: &Surface) -> u16 {
    surface.rect().height.saturating_sub(2)
}

/// Informational box dismissed with Enter.
///
/// Any other key briefly dims the OK button and is otherwise ignored.
pub struct MessageBox {
    base: PanelBase,
    ok: ToggleGroup,
    dimmed: bool,
}

impl MessageBox {
    pub fn new(title: impl Into<String>, message: &str) -> Self {
        Self {
            base: PanelBase::new(title, message),
            ok: ToggleGroup::exclusive(["OK"], 0),
            dimmed: false,
        }
    }

    pub fn show(&mut self, canvas: &mut Canvas) -> Result<()> {
        run_modal(canvas, self)
    }
}

impl Widget for MessageBox {
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

impl HasButtons for MessageBox {
    fn buttons(&self) -> &ToggleGroup {
        &self.ok
    }

    fn buttons_dimmed(&self) -> bool {
        self.dimmed
    }
}

impl Dialog for MessageBox {
    type Output = ();

    fn handle_event(&mut self, event: &InputEvent, _settings: &Settings) -> EventResult<()> {
        match event {
            InputEvent::Enter => EventResult::Done(()),
            _ => {
                self.dimmed = true;
                EventResult::Flash
            }
        }
    }

    fn release(&mut self) {
        self.dimmed = false;
    }
}
