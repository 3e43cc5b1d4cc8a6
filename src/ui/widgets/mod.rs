//! The dialogs callers build and show
//!
//! - MessageBox, YesNoBox: message plus a button row
//! - InputBox: one line of text entry
//! - SingleSelectionBox, MultiSelectionBox: radio and checkbox lists
//! - Menu: full-screen numbered entries bound to actions
//! - ShellBox: a child process on a pty

mod input_box;
mod menu;
mod message_box;
mod selection_box;
mod shell_box;
mod yes_no;

pub use input_box::InputBox;
pub use menu::{Menu, MenuAction, MenuEntry};
pub use message_box::MessageBox;
pub use selection_box::{MultiSelection, MultiSelectionBox, SingleSelectionBox};
pub use shell_box::{Scrollback, ShellBox};
pub use yes_no::YesNoBox;
