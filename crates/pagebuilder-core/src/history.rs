//! Undo/redo over tree snapshots.

use crate::layout::GridCols;
use crate::tree::Tree;
use std::collections::VecDeque;

/// Snapshot history for one editing session.
///
/// Grid columns ride along with the history but are never captured in it:
/// undoing a content edit leaves the grid as it is.
#[derive(Debug, Clone)]
pub struct History {
    past: Vec<Tree>,
    present: Tree,
    /// Front is the next state `redo` restores.
    future: VecDeque<Tree>,
    grid_cols: GridCols,
    /// Maximum number of undo states to keep; `None` keeps everything.
    limit: Option<usize>,
}

impl History {
    /// Fresh history with empty stacks.
    pub fn new(present: Tree, grid_cols: GridCols) -> Self {
        Self {
            past: Vec::new(),
            present,
            future: VecDeque::new(),
            grid_cols,
            limit: None,
        }
    }

    /// Bound the undo stack, dropping the oldest states beyond `limit`.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self.trim();
        self
    }

    pub fn present(&self) -> &Tree {
        &self.present
    }

    /// Undo states, oldest first.
    pub fn past(&self) -> &[Tree] {
        &self.past
    }

    /// Redo states, next first.
    pub fn future(&self) -> impl Iterator<Item = &Tree> {
        self.future.iter()
    }

    pub fn grid_cols(&self) -> GridCols {
        self.grid_cols
    }

    /// Change the grid without touching either stack.
    pub fn set_grid_cols(&mut self, grid_cols: GridCols) {
        self.grid_cols = grid_cols;
    }

    /// Make `next` the present state.
    /// Returns false, leaving everything as it was, when `next` is the
    /// present snapshot itself.
    pub fn commit(&mut self, next: Tree) -> bool {
        if next.same(&self.present) {
            return false;
        }
        let previous = std::mem::replace(&mut self.present, next);
        self.past.push(previous);
        self.future.clear();
        self.trim();
        true
    }

    /// Step back one state.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.past.pop() {
            Some(previous) => {
                let current = std::mem::replace(&mut self.present, previous);
                self.future.push_front(current);
                true
            }
            None => false,
        }
    }

    /// Step forward one state.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.future.pop_front() {
            Some(next) => {
                let current = std::mem::replace(&mut self.present, next);
                self.past.push(current);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Neither stack holds anything.
    pub fn is_clean(&self) -> bool {
        self.past.is_empty() && self.future.is_empty()
    }

    fn trim(&mut self) {
        if let Some(limit) = self.limit
            && self.past.len() > limit
        {
            let excess = self.past.len() - limit;
            self.past.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ComponentKind, Node};

    fn tree(id: &str) -> Tree {
        Tree::new(vec![Node::of_kind(id, ComponentKind::Section)])
    }

    #[test]
    fn test_commit_same_snapshot_is_noop() {
        let start = tree("a");
        let mut history = History::new(start.clone(), GridCols::default());
        assert!(!history.commit(start.clone()));
        assert!(history.is_clean());
        assert!(history.present().same(&start));

        // Structurally equal but a different snapshot still commits.
        assert!(history.commit(tree("a")));
        assert!(history.can_undo());
    }

    #[test]
    fn test_undo_redo_inverse() {
        let first = tree("a");
        let second = tree("b");
        let mut history = History::new(first.clone(), GridCols::new(6).unwrap());
        history.commit(second.clone());

        assert!(history.undo());
        assert!(history.present().same(&first));
        assert!(history.can_redo());

        assert!(history.redo());
        assert!(history.present().same(&second));
        assert_eq!(history.grid_cols().get(), 6);
    }

    #[test]
    fn test_commit_clears_future() {
        let mut history = History::new(tree("a"), GridCols::default());
        history.commit(tree("b"));
        history.undo();
        assert!(history.can_redo());

        history.commit(tree("c"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_future_front_is_next_redo() {
        let (a, b, c) = (tree("a"), tree("b"), tree("c"));
        let mut history = History::new(a, GridCols::default());
        history.commit(b.clone());
        history.commit(c.clone());
        history.undo();
        history.undo();

        let future: Vec<&Tree> = history.future().collect();
        assert!(future[0].same(&b));
        assert!(future[1].same(&c));
    }

    #[test]
    fn test_empty_stacks() {
        let mut history = History::new(tree("a"), GridCols::default());
        assert!(!history.can_undo());
        assert!(!history.undo());
        assert!(!history.can_redo());
        assert!(!history.redo());
    }

    #[test]
    fn test_grid_change_survives_undo() {
        let mut history = History::new(tree("a"), GridCols::default());
        history.commit(tree("b"));
        history.set_grid_cols(GridCols::new(4).unwrap());
        history.undo();
        assert_eq!(history.grid_cols().get(), 4);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let first = tree("a");
        let mut history = History::new(first.clone(), GridCols::default()).with_limit(Some(2));
        history.commit(tree("b"));
        history.commit(tree("c"));
        history.commit(tree("d"));
        assert_eq!(history.past().len(), 2);
        assert!(history.past().iter().all(|t| !t.same(&first)));
    }
}
