//! Split-buffer single-line editor
//!
//! The text is held as the part left of the cursor and the part right of
//! it, so the cursor position is simply the length of the left part. None
//! of this touches the terminal; the owning widget renders after each edit.

/// Editable line with a hard length cap
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineEdit {
    left: String,
    right: String,
    max_len: usize,
}

impl LineEdit {
    /// Start with `default` and the cursor at its end. A default longer than
    /// `max_len` loses its tail.
    pub fn new(default: &str, max_len: usize) -> Self {
        Self {
            left: default.chars().take(max_len).collect(),
            right: String::new(),
            max_len,
        }
    }

    /// Cursor position in characters, always the length of the left part
    pub fn cursor(&self) -> usize {
        self.left.chars().count()
    }

    pub fn len(&self) -> usize {
        self.cursor() + self.right.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &str {
        &self.right
    }

    /// Full text
    pub fn value(&self) -> String {
        let mut value = String::with_capacity(self.left.len() + self.right.len());
        value.push_str(&self.left);
        value.push_str(&self.right);
        value
    }

    /// Text as it should appear in a field `width` cells wide: truncated or
    /// space padded. The buffer itself is left alone.
    pub fn display(&self, width: usize) -> String {
        let mut shown: String = self.left.chars().chain(self.right.chars()).take(width).collect();
        let pad = width.saturating_sub(shown.chars().count());
        shown.extend(std::iter::repeat(' ').take(pad));
        shown
    }

    /// Horizontal window of a field `width` cells wide that keeps the cursor
    /// in view. Returns the padded text and the cursor's column in it.
    pub fn window(&self, width: usize) -> (String, usize) {
        if width == 0 {
            return (String::new(), 0);
        }
        let cursor = self.cursor();
        let offset = (cursor + 1).saturating_sub(width);
        let mut shown: String = self
            .left
            .chars()
            .chain(self.right.chars())
            .skip(offset)
            .take(width)
            .collect();
        let pad = width.saturating_sub(shown.chars().count());
        shown.extend(std::iter::repeat(' ').take(pad));
        (shown, cursor - offset)
    }

    /// Insert at the cursor. Rejected once the line is full.
    pub fn insert(&mut self, ch: char) -> bool {
        if self.len() >= self.max_len {
            return false;
        }
        self.left.push(ch);
        true
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) -> bool {
        self.left.pop().is_some()
    }

    /// Delete character at cursor; the cursor does not move
    pub fn delete_forward(&mut self) -> bool {
        if self.right.is_empty() {
            return false;
        }
        self.right.remove(0);
        true
    }

    /// Shift the cursor by `delta` characters, clamped to the text.
    /// Returns whether the cursor moved.
    pub fn move_cursor(&mut self, delta: isize) -> bool {
        let mut moved = false;
        if delta < 0 {
            for _ in 0..delta.unsigned_abs() {
                match self.left.pop() {
                    Some(ch) => {
                        self.right.insert(0, ch);
                        moved = true;
                    }
                    None => break,
                }
            }
        } else {
            for _ in 0..delta as usize {
                if self.right.is_empty() {
                    break;
                }
                let ch = self.right.remove(0);
                self.left.push(ch);
                moved = true;
            }
        }
        moved
    }

    pub fn home(&mut self) -> bool {
        self.move_cursor(-(self.cursor() as isize))
    }

    pub fn end(&mut self) -> bool {
        self.move_cursor(self.right.chars().count() as isize)
    }

    /// Current value; whether to keep or reset the buffer is up to the caller
    pub fn submit(&self) -> String {
        self.value()
    }

    /// Empty the buffer, keeping the cap
    pub fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_places_cursor_at_end() {
        let edit = LineEdit::new("hello", 10);
        assert_eq!(edit.cursor(), 5);
        assert_eq!(edit.left(), "hello");
        assert_eq!(edit.right(), "");
    }

    #[test]
    fn test_overlong_default_is_cut() {
        let edit = LineEdit::new("abcdefgh", 5);
        assert_eq!(edit.value(), "abcde");
        assert_eq!(edit.cursor(), 5);
    }

    #[test]
    fn test_insert_rejected_at_cap() {
        let mut edit = LineEdit::new("ab", 5);
        for ch in "cde".chars() {
            assert!(edit.insert(ch));
        }
        assert!(!edit.insert('f'));
        assert_eq!(edit.submit(), "abcde");
    }

    #[test]
    fn test_edit_in_the_middle() {
        let mut edit = LineEdit::new("held", 10);
        edit.move_cursor(-1);
        edit.insert('l');
        edit.insert('l');
        assert_eq!(edit.value(), "hellld");
        edit.backspace();
        edit.delete_forward();
        assert_eq!(edit.value(), "hell");
        assert_eq!(edit.cursor(), 4);
        edit.insert('o');
        assert_eq!(edit.value(), "hello");
    }

    #[test]
    fn test_move_cursor_clamps() {
        let mut edit = LineEdit::new("abc", 10);
        assert!(!edit.move_cursor(4));
        assert_eq!(edit.cursor(), 3);
        assert!(edit.move_cursor(-10));
        assert_eq!(edit.cursor(), 0);
        assert_eq!(edit.right(), "abc");
        assert!(!edit.backspace());
        assert!(edit.end());
        assert_eq!(edit.cursor(), 3);
        assert!(edit.home());
        assert!(!edit.home());
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut edit = LineEdit::new("abc", 10);
        let before = edit.clone();
        assert!(!edit.delete_forward());
        assert_eq!(edit, before);
    }

    #[test]
    fn test_display_pads_and_truncates_without_mutating() {
        let mut edit = LineEdit::new("abcdef", 10);
        edit.move_cursor(-2);
        assert_eq!(edit.display(4), "abcd");
        assert_eq!(edit.display(8), "abcdef  ");
        assert_eq!(edit.value(), "abcdef");
        assert_eq!(edit.cursor(), 4);
    }

    #[test]
    fn test_window_follows_cursor() {
        let mut edit = LineEdit::new("abcdefgh", 20);
        assert_eq!(edit.window(10), ("abcdefgh  ".to_string(), 8));
        assert_eq!(edit.window(4), ("fgh ".to_string(), 3));
        edit.home();
        assert_eq!(edit.window(4), ("abcd".to_string(), 0));
        assert_eq!(edit.window(0), (String::new(), 0));
    }

    #[test]
    fn test_multibyte_characters_count_as_one() {
        let mut edit = LineEdit::new("añb", 4);
        assert_eq!(edit.cursor(), 3);
        edit.move_cursor(-2);
        assert_eq!(edit.left(), "a");
        assert_eq!(edit.right(), "ñb");
        assert!(edit.delete_forward());
        assert_eq!(edit.value(), "ab");
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(char),
        Backspace,
        Delete,
        Move(isize),
        Home,
        End,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<char>().prop_map(Op::Insert),
            Just(Op::Backspace),
            Just(Op::Delete),
            (-8isize..8).prop_map(Op::Move),
            Just(Op::Home),
            Just(Op::End),
        ]
    }

    fn apply(edit: &mut LineEdit, op: &Op) {
        match op {
            Op::Insert(ch) => {
                edit.insert(*ch);
            }
            Op::Backspace => {
                edit.backspace();
            }
            Op::Delete => {
                edit.delete_forward();
            }
            Op::Move(delta) => {
                edit.move_cursor(*delta);
            }
            Op::Home => {
                edit.home();
            }
            Op::End => {
                edit.end();
            }
        }
    }

    proptest! {
        #[test]
        fn prop_cursor_and_cap_invariants(
            default in "[a-z]{0,12}",
            max_len in 0usize..10,
            ops in proptest::collection::vec(op(), 0..64),
        ) {
            let mut edit = LineEdit::new(&default, max_len);
            for op in &ops {
                apply(&mut edit, op);
                prop_assert_eq!(edit.cursor(), edit.left().chars().count());
                prop_assert!(edit.len() <= max_len);
                prop_assert!(edit.cursor() <= edit.len());
            }
        }

        #[test]
        fn prop_insert_then_backspace_round_trips(
            default in "[a-z]{0,6}",
            back in 0isize..6,
            ch in any::<char>(),
        ) {
            let mut edit = LineEdit::new(&default, 8);
            edit.move_cursor(-back);
            let before = edit.clone();
            if edit.insert(ch) {
                edit.backspace();
                prop_assert_eq!(edit, before);
            }
        }
    }
}
