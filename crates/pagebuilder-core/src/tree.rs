//! The page tree: an ordered list of root nodes with shared subtrees.

use crate::mutation::MutationError;
use crate::node::{Node, NodeId, NodeRef, normalize};
use crate::placement::ParentKind;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Immutable snapshot of a page's component tree.
///
/// Cloning is cheap. Two trees are [`Tree::same`] when they are the very same
/// snapshot; `==` compares structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree(Arc<Vec<NodeRef>>);

/// Position of a node: its parent (`None` for the page root) and index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub parent_id: Option<NodeId>,
    pub index: usize,
}

impl Location {
    pub fn root(index: usize) -> Self {
        Self {
            parent_id: None,
            index,
        }
    }

    pub fn under(parent: impl Into<NodeId>, index: usize) -> Self {
        Self {
            parent_id: Some(parent.into()),
            index,
        }
    }
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self::from_refs(nodes.into_iter().map(Arc::new).collect())
    }

    pub fn from_refs(nodes: Vec<NodeRef>) -> Self {
        Self(Arc::new(nodes))
    }

    /// Root nodes in order.
    pub fn nodes(&self) -> &[NodeRef] {
        &self.0
    }

    /// Whether both handles point at the same snapshot.
    pub fn same(&self, other: &Tree) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of root nodes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of nodes at every depth.
    pub fn node_count(&self) -> usize {
        self.0.iter().map(|n| n.subtree_len()).sum()
    }

    pub fn find_by_id(&self, id: &NodeId) -> Option<&Node> {
        self.0.iter().find_map(|n| n.find(id))
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Every id in the tree, pre-order.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for node in self.0.iter() {
            node.collect_ids(&mut out);
        }
        out
    }

    /// Where `id` sits in the tree.
    pub fn locate(&self, id: &NodeId) -> Option<Location> {
        fn search(nodes: &[NodeRef], parent: Option<&NodeId>, id: &NodeId) -> Option<Location> {
            for (index, node) in nodes.iter().enumerate() {
                if &node.id == id {
                    return Some(Location {
                        parent_id: parent.cloned(),
                        index,
                    });
                }
                if let Some(found) = search(node.children(), Some(&node.id), id) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.0, None, id)
    }

    /// Node at a location, if the location exists.
    pub fn node_at(&self, location: &Location) -> Option<&NodeRef> {
        self.children_of(location.parent_id.as_ref())?.get(location.index)
    }

    /// Child list of `parent` (the root list for `None`). `None` when the
    /// parent is missing or is a leaf.
    pub fn children_of(&self, parent: Option<&NodeId>) -> Option<&[NodeRef]> {
        match parent {
            None => Some(&self.0),
            Some(id) => self.find_by_id(id)?.children.as_deref(),
        }
    }

    /// Placement context for `parent`. `None` when the parent id is unknown.
    pub fn parent_kind(&self, parent: Option<&NodeId>) -> Option<ParentKind> {
        match parent {
            None => Some(ParentKind::Root),
            Some(id) => self.find_by_id(id).map(|n| ParentKind::Container(n.kind())),
        }
    }

    /// Copy in which every container has a `children` list. Returns `self`
    /// when nothing needed fixing.
    pub fn normalized(&self) -> Tree {
        let fixed: Vec<NodeRef> = self.0.iter().map(normalize).collect();
        if fixed.iter().zip(self.0.iter()).all(|(a, b)| Arc::ptr_eq(a, b)) {
            self.clone()
        } else {
            Tree::from_refs(fixed)
        }
    }

    /// Rewrite the child list of `parent`, rebuilding only the nodes on the
    /// path down to it. Everything else is shared with `self`.
    pub(crate) fn edit_children<R, F>(
        &self,
        parent: Option<&NodeId>,
        edit: F,
    ) -> Result<(Tree, R), MutationError>
    where
        F: FnOnce(&mut Vec<NodeRef>) -> Result<R, MutationError>,
    {
        let path = match parent {
            None => Vec::new(),
            Some(id) => {
                path_to(&self.0, id).ok_or_else(|| MutationError::ParentNotFound(id.clone()))?
            }
        };
        let (roots, result) = rebuild(&self.0, &path, edit)?;
        Ok((Tree::from_refs(roots), result))
    }
}

/// Index path from the root list down to the node with `id`.
fn path_to(nodes: &[NodeRef], id: &NodeId) -> Option<Vec<usize>> {
    for (index, node) in nodes.iter().enumerate() {
        if &node.id == id {
            return Some(vec![index]);
        }
        if let Some(mut rest) = path_to(node.children(), id) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

fn rebuild<R, F>(
    nodes: &[NodeRef],
    path: &[usize],
    edit: F,
) -> Result<(Vec<NodeRef>, R), MutationError>
where
    F: FnOnce(&mut Vec<NodeRef>) -> Result<R, MutationError>,
{
    let mut out = nodes.to_vec();
    match path.split_first() {
        None => {
            let result = edit(&mut out)?;
            Ok((out, result))
        }
        Some((&index, rest)) => {
            let node = &nodes[index];
            let kids = node
                .children
                .as_deref()
                .ok_or_else(|| MutationError::NotAContainer(node.id.clone()))?;
            let (new_kids, result) = rebuild(kids, rest, edit)?;
            out[index] = Arc::new(node.with_children(new_kids));
            Ok((out, result))
        }
    }
}
