//! Toggle groups and the highlight cursor used by lists and button rows
//!
//! Selection (`Toggle::selected`) and focus (`Highlight`) are separate
//! pieces of state. Radio lists move both together; checkbox lists only
//! change selection on an explicit activate.

/// One labelled on/off item
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toggle {
    pub label: String,
    pub selected: bool,
}

impl Toggle {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            selected: false,
        }
    }
}

/// How toggling one item affects the rest of its group
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discipline {
    /// Exactly one item selected at any time (radio buttons, Yes/No, OK/Cancel)
    Exclusive,
    /// Each item flips on its own (checkboxes)
    Independent,
}

/// Ordered group of toggles, owned by a single widget
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleGroup {
    items: Vec<Toggle>,
    discipline: Discipline,
}

impl ToggleGroup {
    /// Exclusive group with `default` selected (clamped into range)
    pub fn exclusive<S: Into<String>>(labels: impl IntoIterator<Item = S>, default: usize) -> Self {
        let mut group = Self {
            items: labels.into_iter().map(Toggle::new).collect(),
            discipline: Discipline::Exclusive,
        };
        if !group.items.is_empty() {
            let index = default.min(group.items.len() - 1);
            group.toggle(index);
        }
        group
    }

    /// Independent group with nothing selected
    pub fn independent<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            items: labels.into_iter().map(Toggle::new).collect(),
            discipline: Discipline::Independent,
        }
    }

    pub fn discipline(&self) -> Discipline {
        self.discipline
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Toggle] {
        &self.items
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(|t| t.selected)
    }

    /// Exclusive: select `index`, deselect the rest. Independent: flip `index`.
    /// Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }
        match self.discipline {
            Discipline::Exclusive => {
                for (i, item) in self.items.iter_mut().enumerate() {
                    item.selected = i == index;
                }
            }
            Discipline::Independent => {
                self.items[index].selected = !self.items[index].selected;
            }
        }
    }

    /// Index of the first selected item
    pub fn selected_index(&self) -> Option<usize> {
        self.items.iter().position(|t| t.selected)
    }

    /// Label of the first selected item
    pub fn selected_label(&self) -> Option<&str> {
        self.items.iter().find(|t| t.selected).map(|t| t.label.as_str())
    }

    /// Labels of all selected items, in list order
    pub fn selected_labels(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|t| t.selected)
            .map(|t| t.label.clone())
            .collect()
    }

    /// Exclusive pair: select whichever item is not selected now
    pub fn flip(&mut self) {
        if let Some(current) = self.selected_index() {
            self.toggle((current + 1) % self.items.len());
        }
    }
}

/// Focus cursor over an ordered list; clamped, never wraps
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Highlight {
    index: usize,
    count: usize,
}

impl Highlight {
    pub fn new(count: usize) -> Self {
        Self { index: 0, count }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Move by `delta`, clamped to `[0, count - 1]`. Returns the new index.
    pub fn move_by(&mut self, delta: isize) -> usize {
        if self.count == 0 {
            self.index = 0;
            return 0;
        }
        let max = self.count as isize - 1;
        self.index = (self.index as isize).saturating_add(delta).clamp(0, max) as usize;
        self.index
    }

    pub fn home(&mut self) -> usize {
        self.move_by(-(self.count as isize))
    }

    pub fn end(&mut self) -> usize {
        self.move_by(self.count as isize)
    }

    /// Jump to `index` if it exists
    pub fn set(&mut self, index: usize) -> bool {
        if index < self.count {
            self.index = index;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected_count(group: &ToggleGroup) -> usize {
        group.items().iter().filter(|t| t.selected).count()
    }

    #[test]
    fn test_exclusive_keeps_exactly_one() {
        let mut group = ToggleGroup::exclusive(["a", "b", "c", "d"], 0);
        assert_eq!(selected_count(&group), 1);
        for index in [3, 1, 1, 0, 2, 9, 3] {
            group.toggle(index);
            assert_eq!(selected_count(&group), 1);
        }
        assert_eq!(group.selected_label(), Some("d"));
    }

    #[test]
    fn test_exclusive_default_clamped() {
        let group = ToggleGroup::exclusive(["yes", "no"], 7);
        assert_eq!(group.selected_index(), Some(1));
        let empty = ToggleGroup::exclusive(Vec::<String>::new(), 0);
        assert_eq!(empty.selected_index(), None);
    }

    #[test]
    fn test_independent_double_toggle_restores() {
        let mut group = ToggleGroup::independent(["a", "b", "c", "d", "e"]);
        group.toggle(0);
        let original = group.clone();
        group.toggle(2);
        assert!(group.is_selected(2));
        assert!(group.is_selected(0));
        assert!(!group.is_selected(1));
        group.toggle(2);
        assert_eq!(group, original);
    }

    #[test]
    fn test_selected_labels_in_order() {
        let mut group = ToggleGroup::independent(["A", "B", "C"]);
        group.toggle(2);
        group.toggle(0);
        assert_eq!(group.selected_labels(), vec!["A", "C"]);
    }

    #[test]
    fn test_flip_pair() {
        let mut group = ToggleGroup::exclusive(["OK", "Cancel"], 0);
        group.flip();
        assert_eq!(group.selected_label(), Some("Cancel"));
        group.flip();
        assert_eq!(group.selected_label(), Some("OK"));
    }

    #[test]
    fn test_highlight_clamps() {
        let mut h = Highlight::new(4);
        assert_eq!(h.move_by(-1), 0);
        h.set(3);
        assert_eq!(h.move_by(5), 3);
        assert_eq!(h.home(), 0);
        assert_eq!(h.end(), 3);
        assert!(!h.set(4));
        assert_eq!(Highlight::new(0).move_by(1), 0);
    }
}
