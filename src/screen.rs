//! Character-cell buffers
//!
//! `Surface` is the drawing target owned by one panel. `Screen` is the
//! double-buffered composition of all visible surfaces; it only sends the
//! cells that changed since the last flush.

use std::io;

use crate::terminal::{Attr, Terminal};
use crate::ui::geometry::{Bounds, Rect};

/// A single cell on the screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub attr: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            attr: Attr::Normal,
        }
    }
}

impl Cell {
    pub fn new(ch: char, attr: Attr) -> Self {
        Self { ch, attr }
    }
}

/// A rectangular region of cells placed somewhere on the screen.
///
/// Coordinates passed to the drawing methods are relative to the surface's
/// own top-left corner; anything outside the surface is clipped.
#[derive(Clone, Debug)]
pub struct Surface {
    rect: Rect,
    cells: Vec<Cell>,
}

impl Surface {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            cells: vec![Cell::default(); rect.height as usize * rect.width as usize],
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.rect.height, self.rect.width)
    }

    /// Move/resize the surface. Contents are discarded when the size changes.
    pub fn place(&mut self, rect: Rect) {
        if rect.height != self.rect.height || rect.width != self.rect.width {
            self.cells = vec![Cell::default(); rect.height as usize * rect.width as usize];
        }
        self.rect = rect;
    }

    fn index(&self, row: u16, col: u16) -> Option<usize> {
        if row < self.rect.height && col < self.rect.width {
            Some(row as usize * self.rect.width as usize + col as usize)
        } else {
            None
        }
    }

    pub fn set(&mut self, row: u16, col: u16, ch: char, attr: Attr) {
        if let Some(idx) = self.index(row, col) {
            self.cells[idx] = Cell::new(ch, attr);
        }
    }

    pub fn get(&self, row: u16, col: u16) -> Option<Cell> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Write text starting at (row, col), clipped at the right edge
    pub fn write_text(&mut self, row: u16, col: u16, text: &str, attr: Attr) {
        let mut c = col;
        for ch in text.chars() {
            if c >= self.rect.width {
                break;
            }
            self.set(row, c, ch, attr);
            c += 1;
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Draw a single-line border along the surface edge
    pub fn draw_border(&mut self) {
        let (height, width) = (self.rect.height, self.rect.width);
        if width < 2 || height < 2 {
            return;
        }
        let attr = Attr::Normal;

        self.set(0, 0, '┌', attr);
        self.set(0, width - 1, '┐', attr);
        self.set(height - 1, 0, '└', attr);
        self.set(height - 1, width - 1, '┘', attr);

        for c in 1..width - 1 {
            self.set(0, c, '─', attr);
            self.set(height - 1, c, '─', attr);
        }
        for r in 1..height - 1 {
            self.set(r, 0, '│', attr);
            self.set(r, width - 1, '│', attr);
        }
    }

    /// Row `row` as a string, for assertions and debugging
    pub fn row_text(&self, row: u16) -> String {
        (0..self.rect.width)
            .filter_map(|c| self.get(row, c).map(|cell| cell.ch))
            .collect()
    }
}

/// Double-buffered screen
pub struct Screen {
    width: u16,
    height: u16,
    front: Vec<Cell>, // Currently displayed
    back: Vec<Cell>,  // Being drawn to
    cursor_row: u16,
    cursor_col: u16,
    cursor_visible: bool,
}

impl Screen {
    pub fn new(width: u16, height: u16) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            front: vec![Cell::new('\0', Attr::Normal); size], // Force initial draw
            back: vec![Cell::default(); size],
            cursor_row: 0,
            cursor_col: 0,
            cursor_visible: false,
        }
    }

    /// (width, height)
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        let size = (width as usize) * (height as usize);
        self.width = width;
        self.height = height;
        self.front = vec![Cell::new('\0', Attr::Normal); size];
        self.back = vec![Cell::default(); size];
    }

    fn index(&self, row: u16, col: u16) -> Option<usize> {
        if row < self.height && col < self.width {
            Some(row as usize * self.width as usize + col as usize)
        } else {
            None
        }
    }

    pub fn set(&mut self, row: u16, col: u16, cell: Cell) {
        if let Some(idx) = self.index(row, col) {
            self.back[idx] = cell;
        }
    }

    pub fn get(&self, row: u16, col: u16) -> Option<Cell> {
        self.index(row, col).map(|idx| self.back[idx])
    }

    pub fn clear(&mut self) {
        self.back.fill(Cell::default());
    }

    /// Copy a surface into the back buffer at its own position
    pub fn blit(&mut self, surface: &Surface) {
        let rect = surface.rect();
        for r in 0..rect.height {
            for c in 0..rect.width {
                if let Some(cell) = surface.get(r, c) {
                    self.set(rect.top + r, rect.left + c, cell);
                }
            }
        }
    }

    pub fn set_cursor(&mut self, row: u16, col: u16) {
        self.cursor_row = row;
        self.cursor_col = col;
    }

    pub fn cursor(&self) -> (u16, u16) {
        (self.cursor_row, self.cursor_col)
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Row `row` of the back buffer as a string
    pub fn row_text(&self, row: u16) -> String {
        (0..self.width)
            .filter_map(|c| self.get(row, c).map(|cell| cell.ch))
            .collect()
    }

    /// Flush changes to the terminal (only updates changed cells)
    pub fn flush(&mut self, term: &mut Terminal) -> io::Result<()> {
        let mut last_attr: Option<Attr> = None;
        let mut last_pos: Option<(u16, u16)> = None;

        for row in 0..self.height {
            for col in 0..self.width {
                let idx = row as usize * self.width as usize + col as usize;
                let back = self.back[idx];
                if self.front[idx] == back {
                    continue;
                }

                let contiguous = matches!(last_pos, Some((r, c)) if r == row && c + 1 == col);
                if !contiguous {
                    term.goto(row + 1, col + 1)?;
                }
                if last_attr != Some(back.attr) {
                    term.set_attr(back.attr)?;
                    last_attr = Some(back.attr);
                }
                term.write_char(back.ch)?;

                self.front[idx] = back;
                last_pos = Some((row, col));
            }
        }

        if self.cursor_visible {
            term.goto(self.cursor_row + 1, self.cursor_col + 1)?;
            term.show_cursor()?;
        } else {
            term.hide_cursor()?;
        }

        term.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_clips_text() {
        let mut s = Surface::new(Rect::new(2, 3, 3, 5));
        s.write_text(1, 2, "abcdef", Attr::Normal);
        assert_eq!(s.row_text(1), "  abc");
        s.write_text(7, 0, "zzz", Attr::Normal);
        assert_eq!(s.row_text(2), "     ");
    }

    #[test]
    fn test_border_corners() {
        let mut s = Surface::new(Rect::new(0, 0, 3, 4));
        s.draw_border();
        assert_eq!(s.row_text(0), "┌──┐");
        assert_eq!(s.row_text(1), "│  │");
        assert_eq!(s.row_text(2), "└──┘");
    }

    #[test]
    fn test_blit_places_surface() {
        let mut screen = Screen::new(10, 4);
        let mut s = Surface::new(Rect::new(1, 2, 1, 3));
        s.write_text(0, 0, "hey", Attr::Reverse);
        screen.blit(&s);
        assert_eq!(screen.row_text(1), "  hey     ");
        assert_eq!(screen.get(1, 2), Some(Cell::new('h', Attr::Reverse)));
    }

    #[test]
    fn test_place_keeps_cells_when_only_moving() {
        let mut s = Surface::new(Rect::new(0, 0, 1, 3));
        s.write_text(0, 0, "abc", Attr::Normal);
        s.place(Rect::new(4, 4, 1, 3));
        assert_eq!(s.row_text(0), "abc");
        s.place(Rect::new(4, 4, 1, 4));
        assert_eq!(s.row_text(0), "    ");
    }
}
