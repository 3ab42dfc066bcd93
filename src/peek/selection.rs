//! Process ids marked for cancellation.

use std::collections::BTreeSet;

/// Set of pids queued for cancellation.
///
/// Independent of filtering: ids stay selected while hidden by the search
/// and across snapshot replacements, even after their process has exited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<u32>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, pid: u32) {
        self.ids.insert(pid);
    }

    pub fn remove(&mut self, pid: u32) {
        self.ids.remove(&pid);
    }

    /// Flip membership of one pid. Returns the new membership.
    pub fn toggle(&mut self, pid: u32) -> bool {
        if self.ids.remove(&pid) {
            false
        } else {
            self.ids.insert(pid);
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.ids.contains(&pid)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected pids in ascending order.
    pub fn ids(&self) -> Vec<u32> {
        self.ids.iter().copied().collect()
    }

    /// Master checkbox: checking adds every visible pid, unchecking removes
    /// exactly the visible pids and leaves hidden selections alone.
    pub fn set_visible(&mut self, visible: impl IntoIterator<Item = u32>, checked: bool) {
        for pid in visible {
            if checked {
                self.ids.insert(pid);
            } else {
                self.ids.remove(&pid);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_remove_contains() {
        let mut s = SelectionSet::new();
        assert!(s.is_empty());
        s.add(5);
        s.add(5);
        assert_eq!(s.len(), 1);
        assert!(s.contains(5));
        s.remove(5);
        assert!(!s.contains(5));
        // removing an absent id is a no-op
        s.remove(99);
        assert!(s.is_empty());
    }

    #[test]
    fn toggle_flips_membership() {
        let mut s = SelectionSet::new();
        assert!(s.toggle(7));
        assert!(s.contains(7));
        assert!(!s.toggle(7));
        assert!(!s.contains(7));
    }

    #[test]
    fn ids_are_sorted() {
        let mut s = SelectionSet::new();
        for pid in [30, 10, 20] {
            s.add(pid);
        }
        assert_eq!(s.ids(), vec![10, 20, 30]);
    }

    #[test]
    fn select_all_then_uncheck_removes_only_visible() {
        let mut s = SelectionSet::new();
        s.add(1); // hidden by the filter
        s.add(3); // visible and already selected
        let before = s.clone();
        let visible = [2, 3, 4];

        s.set_visible(visible, true);
        assert_eq!(s.ids(), vec![1, 2, 3, 4]);

        s.set_visible(visible, false);
        let mut expected = before;
        for pid in visible {
            expected.remove(pid);
        }
        assert_eq!(s, expected);
        assert_eq!(s.ids(), vec![1]);
    }

    #[test]
    fn clear_empties() {
        let mut s = SelectionSet::new();
        s.set_visible([1, 2, 3], true);
        s.clear();
        assert_eq!(s.len(), 0);
    }
}
