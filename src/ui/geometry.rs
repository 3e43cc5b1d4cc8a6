//! Placement math for a box inside its parent surface
//!
//! Nothing here caches the parent's size: every function takes the parent's
//! current bounds, so a resized terminal is honoured on the next call.

use crate::error::{Error, Result};

/// Size of a parent surface in character cells
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bounds {
    pub height: u16,
    pub width: u16,
}

impl Bounds {
    pub fn new(height: u16, width: u16) -> Self {
        Self { height, width }
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }
}

/// Represents a rectangular region, 0-based
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub top: u16,
    pub left: u16,
    pub height: u16,
    pub width: u16,
}

impl Rect {
    pub fn new(top: u16, left: u16, height: u16, width: u16) -> Self {
        Self { top, left, height, width }
    }

    /// Whether every cell of this rect lies inside `parent`
    pub fn fits_in(&self, parent: Bounds) -> bool {
        self.top as u32 + self.height as u32 <= parent.height as u32
            && self.left as u32 + self.width as u32 <= parent.width as u32
    }
}

/// Clamp one requested dimension against the parent's extent.
/// Oversized requests keep a one-cell margin on each side when there is room.
fn clamp_extent(requested: u16, available: u16) -> u16 {
    let requested = requested.max(1);
    if requested > available {
        available.saturating_sub(2).max(1).min(available)
    } else {
        requested
    }
}

/// Center a `height` x `width` box in `parent`.
///
/// Integer division biases odd leftovers toward the top-left. Fails only
/// when the parent cannot hold a single cell.
pub fn center(parent: Bounds, height: u16, width: u16) -> Result<Rect> {
    if parent.is_empty() {
        return Err(Error::LayoutInfeasible {
            height: parent.height,
            width: parent.width,
        });
    }
    let height = clamp_extent(height, parent.height);
    let width = clamp_extent(width, parent.width);
    Ok(Rect::new(
        (parent.height - height) / 2,
        (parent.width - width) / 2,
        height,
        width,
    ))
}

fn clamp_axis(pos: u16, delta: i32, size: u16, available: u16) -> u16 {
    let max = available.saturating_sub(size) as i32;
    (pos as i32 + delta).clamp(0, max) as u16
}

/// Move `current` by (`dy`, `dx`), snapping to the nearest legal position
/// instead of leaving the parent. A rect larger than the parent is shrunk.
pub fn adjust(current: Rect, dy: i32, dx: i32, parent: Bounds) -> Rect {
    let height = current.height.min(parent.height);
    let width = current.width.min(parent.width);
    Rect {
        top: clamp_axis(current.top, dy, height, parent.height),
        left: clamp_axis(current.left, dx, width, parent.width),
        height,
        width,
    }
}

/// Absolute move, expressed as an `adjust` from the current position
pub fn move_to(current: Rect, top: u16, left: u16, parent: Bounds) -> Rect {
    adjust(
        current,
        top as i32 - current.top as i32,
        left as i32 - current.left as i32,
        parent,
    )
}
