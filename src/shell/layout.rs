//! Split tree arranging panes on screen.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::pane::PaneId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitDirection {
    /// Side by side.
    Vertical,
    /// Stacked.
    Horizontal,
}

impl SplitDirection {
    fn axis(self) -> Direction {
        match self {
            SplitDirection::Vertical => Direction::Horizontal,
            SplitDirection::Horizontal => Direction::Vertical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneTree {
    Leaf(PaneId),
    Split {
        direction: SplitDirection,
        children: Vec<PaneTree>,
    },
}

impl PaneTree {
    /// Pane ids in layout order (left to right, top to bottom).
    pub fn order(&self) -> Vec<PaneId> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect(&self, out: &mut Vec<PaneId>) {
        match self {
            PaneTree::Leaf(id) => out.push(*id),
            PaneTree::Split { children, .. } => {
                for child in children {
                    child.collect(out);
                }
            }
        }
    }

    pub fn contains(&self, id: PaneId) -> bool {
        match self {
            PaneTree::Leaf(leaf) => *leaf == id,
            PaneTree::Split { children, .. } => children.iter().any(|c| c.contains(id)),
        }
    }

    /// Place `new` next to `target`. A split in the same direction gains a
    /// sibling; otherwise `target` is wrapped in a new split.
    pub fn split(&mut self, target: PaneId, new: PaneId, direction: SplitDirection) -> bool {
        if *self == PaneTree::Leaf(target) {
            *self = PaneTree::Split {
                direction,
                children: vec![PaneTree::Leaf(target), PaneTree::Leaf(new)],
            };
            return true;
        }
        match self {
            PaneTree::Leaf(_) => false,
            PaneTree::Split {
                direction: own,
                children,
            } => {
                if *own == direction {
                    if let Some(pos) = children
                        .iter()
                        .position(|c| matches!(c, PaneTree::Leaf(id) if *id == target))
                    {
                        children.insert(pos + 1, PaneTree::Leaf(new));
                        return true;
                    }
                }
                children
                    .iter_mut()
                    .any(|child| child.split(target, new, direction))
            }
        }
    }

    /// Remove a pane. Splits left with one child collapse into it. The last
    /// remaining pane is never removed.
    pub fn remove(&mut self, id: PaneId) -> bool {
        if matches!(self, PaneTree::Leaf(_)) {
            return false;
        }
        let removed = self.remove_inner(id);
        self.collapse();
        removed
    }

    fn remove_inner(&mut self, id: PaneId) -> bool {
        let PaneTree::Split { children, .. } = self else {
            return false;
        };
        if let Some(pos) = children
            .iter()
            .position(|c| matches!(c, PaneTree::Leaf(leaf) if *leaf == id))
        {
            children.remove(pos);
            return true;
        }
        children.iter_mut().any(|child| child.remove_inner(id))
    }

    fn collapse(&mut self) {
        if let PaneTree::Split { children, .. } = self {
            for child in children.iter_mut() {
                child.collapse();
            }
            if children.len() == 1 {
                let only = children.remove(0);
                *self = only;
            }
        }
    }

    /// Screen area of each pane within `area`, in layout order.
    pub fn areas(&self, area: Rect) -> Vec<(PaneId, Rect)> {
        let mut out = Vec::new();
        self.place(area, &mut out);
        out
    }

    fn place(&self, area: Rect, out: &mut Vec<(PaneId, Rect)>) {
        match self {
            PaneTree::Leaf(id) => out.push((*id, area)),
            PaneTree::Split {
                direction,
                children,
            } => {
                let n = children.len() as u32;
                let chunks = Layout::default()
                    .direction(direction.axis())
                    .constraints(vec![Constraint::Ratio(1, n); children.len()])
                    .split(area);
                for (child, chunk) in children.iter().zip(chunks.iter()) {
                    child.place(*chunk, out);
                }
            }
        }
    }
}
