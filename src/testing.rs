//! Scripted backend for driving dialogs without a terminal

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crate::canvas::{Backend, Canvas};
use crate::screen::{Cell, Screen};
use crate::settings::Settings;
use crate::terminal::{Attr, Key};
use crate::ui::geometry::Bounds;

/// One presented screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub cells: Vec<Vec<Cell>>,
    pub cursor: Option<(u16, u16)>,
}

impl Frame {
    pub fn row(&self, row: usize) -> String {
        self.cells[row].iter().map(|c| c.ch).collect()
    }

    pub fn attr(&self, row: usize, col: usize) -> Attr {
        self.cells[row][col].attr
    }

    pub fn contains(&self, text: &str) -> bool {
        (0..self.cells.len()).any(|r| self.row(r).contains(text))
    }

    /// Position of the first occurrence of `text`
    pub fn find(&self, text: &str) -> Option<(usize, usize)> {
        (0..self.cells.len()).find_map(|r| {
            let row = self.row(r);
            row.find(text).map(|byte| (r, row[..byte].chars().count()))
        })
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().flatten().all(|c| c.ch == ' ')
    }
}

#[derive(Default)]
struct Recorded {
    bounds: Bounds,
    keys: VecDeque<Key>,
    frames: Vec<Frame>,
}

/// Shared view of what the scripted backend has seen and shown
#[derive(Clone, Default)]
pub struct Recorder {
    inner: Rc<RefCell<Recorded>>,
}

impl Recorder {
    pub fn last_frame(&self) -> Frame {
        self.inner
            .borrow()
            .frames
            .last()
            .cloned()
            .expect("nothing presented yet")
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.inner.borrow().frames.clone()
    }

    pub fn set_bounds(&self, bounds: Bounds) {
        self.inner.borrow_mut().bounds = bounds;
    }

    pub fn push_key(&self, key: Key) {
        self.inner.borrow_mut().keys.push_back(key);
    }

    pub fn keys_left(&self) -> usize {
        self.inner.borrow().keys.len()
    }
}

pub struct ScriptedBackend {
    shared: Recorder,
}

impl Backend for ScriptedBackend {
    fn size(&mut self) -> Bounds {
        self.shared.inner.borrow().bounds
    }

    fn read_key(&mut self, timeout: Option<Duration>) -> io::Result<Option<Key>> {
        match self.shared.inner.borrow_mut().keys.pop_front() {
            Some(key) => Ok(Some(key)),
            None if timeout.is_some() => Ok(None),
            None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted")),
        }
    }

    fn present(&mut self, screen: &mut Screen) -> io::Result<()> {
        let (width, height) = screen.size();
        let cells = (0..height)
            .map(|r| {
                (0..width)
                    .map(|c| screen.get(r, c).unwrap_or_default())
                    .collect()
            })
            .collect();
        let cursor = screen.cursor_visible().then(|| screen.cursor());
        self.shared.inner.borrow_mut().frames.push(Frame { cells, cursor });
        Ok(())
    }
}

/// Canvas of `bounds` that replays `keys`, with flashes shortened to zero
pub fn scripted(bounds: Bounds, keys: Vec<Key>) -> (Canvas, Recorder) {
    let recorder = Recorder::default();
    {
        let mut inner = recorder.inner.borrow_mut();
        inner.bounds = bounds;
        inner.keys = keys.into();
    }
    let backend = ScriptedBackend {
        shared: recorder.clone(),
    };
    let settings = Settings::default()
        .with_flash_duration(Duration::ZERO)
        .with_poll_interval(Duration::from_millis(1));
    (Canvas::new(backend).with_settings(settings), recorder)
}

/// Keys for typing `text`
pub fn typed(text: &str) -> Vec<Key> {
    text.chars().map(Key::Char).collect()
}
