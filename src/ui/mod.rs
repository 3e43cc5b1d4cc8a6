//! Dialog building blocks: geometry, editing and selection models, the
//! panel base and the concrete widgets

pub mod geometry;
pub mod line_edit;
pub mod panel;
pub mod toggle;
pub mod widgets;

pub use geometry::{Bounds, Rect};
pub use line_edit::LineEdit;
pub use panel::{Dialog, EventResult, Widget};
pub use toggle::{Discipline, Highlight, Toggle, ToggleGroup};
