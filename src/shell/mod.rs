//! Shell panes and their split layout.

mod layout;
mod pane;

pub use layout::{PaneTree, SplitDirection};
pub use pane::{LineKind, Pane, PaneId};

use std::collections::HashMap;

use ratatui::layout::Rect;

/// All panes, their arrangement and which one has focus.
#[derive(Debug)]
pub struct Workspace {
    panes: HashMap<PaneId, Pane>,
    tree: PaneTree,
    active: PaneId,
    next_id: PaneId,
}

impl Workspace {
    /// A single pane waiting for its first prompt.
    pub fn new() -> Self {
        let first = 1;
        let mut panes = HashMap::new();
        panes.insert(first, Pane::loading(first));
        Self {
            panes,
            tree: PaneTree::Leaf(first),
            active: first,
            next_id: first + 1,
        }
    }

    pub fn active_id(&self) -> PaneId {
        self.active
    }

    pub fn active(&self) -> Option<&Pane> {
        self.panes.get(&self.active)
    }

    pub fn active_mut(&mut self) -> Option<&mut Pane> {
        self.panes.get_mut(&self.active)
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.get(&id)
    }

    /// `None` when the pane was closed; late replies for it are dropped.
    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.panes.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.panes.len()
    }

    /// Split the active pane. The new pane gets focus and its id is
    /// returned so the caller can fetch its prompt.
    pub fn split(&mut self, direction: SplitDirection) -> PaneId {
        let id = self.next_id;
        self.next_id += 1;
        self.tree.split(self.active, id, direction);
        self.panes.insert(id, Pane::loading(id));
        self.active = id;
        id
    }

    /// Close the active pane. Returns `false` for the last pane.
    pub fn close_active(&mut self) -> bool {
        let order = self.tree.order();
        let pos = order.iter().position(|&id| id == self.active).unwrap_or(0);
        if !self.tree.remove(self.active) {
            return false;
        }
        self.panes.remove(&self.active);
        let remaining = self.tree.order();
        self.active = remaining[pos.min(remaining.len() - 1)];
        true
    }

    /// Move focus to the next pane in layout order, wrapping around.
    pub fn focus_next(&mut self) {
        let order = self.tree.order();
        if let Some(pos) = order.iter().position(|&id| id == self.active) {
            self.active = order[(pos + 1) % order.len()];
        }
    }

    pub fn focus(&mut self, id: PaneId) -> bool {
        if self.tree.contains(id) {
            self.active = id;
            true
        } else {
            false
        }
    }

    /// Pane areas within `area`, in layout order.
    pub fn areas(&self, area: Rect) -> Vec<(PaneId, Rect)> {
        self.tree.areas(area)
    }

    /// Pane under a screen position.
    pub fn pane_at(&self, area: Rect, column: u16, row: u16) -> Option<PaneId> {
        self.areas(area)
            .into_iter()
            .find(|(_, r)| {
                column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
            })
            .map(|(id, _)| id)
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_loading_pane() {
        let ws = Workspace::new();
        assert_eq!(ws.len(), 1);
        assert!(ws.active().unwrap().is_pending());
    }

    #[test]
    fn split_focuses_new_pane() {
        let mut ws = Workspace::new();
        let first = ws.active_id();
        let second = ws.split(SplitDirection::Vertical);
        assert_ne!(first, second);
        assert_eq!(ws.active_id(), second);
        assert_eq!(ws.len(), 2);
    }

    #[test]
    fn close_moves_focus_and_keeps_last_pane() {
        let mut ws = Workspace::new();
        let first = ws.active_id();
        let second = ws.split(SplitDirection::Horizontal);
        assert!(ws.close_active());
        assert!(ws.pane(second).is_none());
        assert_eq!(ws.active_id(), first);
        assert!(!ws.close_active());
        assert_eq!(ws.len(), 1);
    }

    #[test]
    fn closed_pane_drops_late_replies() {
        let mut ws = Workspace::new();
        let second = ws.split(SplitDirection::Vertical);
        ws.close_active();
        assert!(ws.pane_mut(second).is_none());
    }

    #[test]
    fn focus_next_wraps() {
        let mut ws = Workspace::new();
        let a = ws.active_id();
        let b = ws.split(SplitDirection::Vertical);
        ws.focus_next();
        assert_eq!(ws.active_id(), a);
        ws.focus_next();
        assert_eq!(ws.active_id(), b);
        assert!(!ws.focus(42));
    }

    #[test]
    fn pane_at_hits_the_right_pane() {
        let mut ws = Workspace::new();
        let a = ws.active_id();
        let b = ws.split(SplitDirection::Vertical);
        let area = Rect::new(0, 0, 80, 20);
        assert_eq!(ws.pane_at(area, 1, 1), Some(a));
        assert_eq!(ws.pane_at(area, 79, 19), Some(b));
        assert_eq!(ws.pane_at(area, 80, 5), None);
    }
}
