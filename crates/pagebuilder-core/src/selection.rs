//! Selection state for the editing surface.

use crate::node::NodeId;
use crate::tree::Tree;

/// Ordered set of selected nodes plus focus and hover.
///
/// Order is click order; grouping uses tree order instead, so callers should
/// not rely on it for anything structural.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Vec<NodeId>,
    /// Node whose visual representation holds focus.
    focused: Option<NodeId>,
    hovered: Option<NodeId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in the order they were added.
    pub fn ids(&self) -> &[NodeId] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.selected.contains(id)
    }

    /// The only selected node, if exactly one is selected.
    pub fn single(&self) -> Option<&NodeId> {
        match self.selected.as_slice() {
            [id] => Some(id),
            _ => None,
        }
    }

    /// Select a single node (clears other selections).
    pub fn select(&mut self, id: NodeId) {
        self.selected.clear();
        self.selected.push(id);
    }

    /// Replace the selection wholesale, dropping repeats.
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.selected.clear();
        for id in ids {
            self.add(id);
        }
    }

    pub fn add(&mut self, id: NodeId) {
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
    }

    /// Remove `id` if selected, append it otherwise.
    /// Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(id);
            true
        }
    }

    pub fn deselect(&mut self, id: &NodeId) {
        self.selected.retain(|s| s != id);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn focused(&self) -> Option<&NodeId> {
        self.focused.as_ref()
    }

    pub fn set_focused(&mut self, id: Option<NodeId>) {
        self.focused = id;
    }

    pub fn hovered(&self) -> Option<&NodeId> {
        self.hovered.as_ref()
    }

    pub fn set_hovered(&mut self, id: Option<NodeId>) {
        self.hovered = id;
    }

    /// Drop ids that no longer exist in `tree` (after undo, remove, ungroup).
    pub fn retain_existing(&mut self, tree: &Tree) {
        self.selected.retain(|id| tree.contains(id));
        if self.focused.as_ref().is_some_and(|id| !tree.contains(id)) {
            self.focused = None;
        }
        if self.hovered.as_ref().is_some_and(|id| !tree.contains(id)) {
            self.hovered = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ComponentKind, Node};

    #[test]
    fn test_toggle_keeps_order() {
        let mut selection = SelectionState::new();
        assert!(selection.toggle("a".into()));
        assert!(selection.toggle("b".into()));
        assert!(selection.toggle("c".into()));
        assert!(!selection.toggle("b".into()));
        assert_eq!(selection.ids().to_vec(), vec![NodeId::from("a"), NodeId::from("c")]);
    }

    #[test]
    fn test_select_replaces() {
        let mut selection = SelectionState::new();
        selection.select_all(["a".into(), "b".into(), "a".into()]);
        assert_eq!(selection.len(), 2);

        selection.select("c".into());
        assert_eq!(selection.single(), Some(&NodeId::from("c")));
    }

    #[test]
    fn test_retain_existing() {
        let tree = Tree::new(vec![Node::of_kind("a", ComponentKind::Section)]);
        let mut selection = SelectionState::new();
        selection.select_all(["a".into(), "gone".into()]);
        selection.set_focused(Some("gone".into()));

        selection.retain_existing(&tree);
        assert_eq!(selection.ids().to_vec(), vec![NodeId::from("a")]);
        assert!(selection.focused().is_none());
    }
}
