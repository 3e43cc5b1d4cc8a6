//! Panelkit
//!
//! Stacked modal dialogs for raw ANSI terminals: menus, message and yes/no
//! boxes, text input, radio and checkbox lists, and a boxed shell. Dialogs
//! are drawn on a shared [`Canvas`] and each runs its own key loop until it
//! has an answer.

pub mod canvas;
pub mod error;
pub mod input;
pub mod pty;
pub mod screen;
pub mod settings;
pub mod terminal;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

pub use canvas::{Backend, Canvas, ModalSession};
pub use error::{Error, Result};
pub use settings::Settings;
pub use terminal::Terminal;
pub use ui::widgets::{
    InputBox, Menu, MenuAction, MenuEntry, MessageBox, MultiSelection, MultiSelectionBox, ShellBox,
    SingleSelectionBox, YesNoBox,
};
