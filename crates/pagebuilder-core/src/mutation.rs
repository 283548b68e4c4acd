//! Tree mutations: a pure reducer from `(tree, intent)` to the next tree.
//!
//! Every successful mutation rebuilds only the nodes on the path to the edit;
//! untouched subtrees are shared with the input. A declined intent leaves the
//! tree exactly as it was.

use crate::layout::EditorFlags;
use crate::node::{ComponentKind, DimensionField, FULL_SIZE, GroupKind, Node, NodeId, NodeRef, Props};
use crate::placement::{ParentKind, PlacementPolicy, can_drop_child, validate_placement};
use crate::tree::{Location, Tree};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Why an intent was declined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("Parent not found: {0}")]
    ParentNotFound(NodeId),
    #[error("Node {0} cannot own children")]
    NotAContainer(NodeId),
    #[error("Index {index} out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("'{child}' cannot be placed inside '{parent}'")]
    PlacementRejected { parent: ParentKind, child: ComponentKind },
    #[error("Invalid placement: {}", .0.join("; "))]
    InvalidSubtree(Vec<String>),
    #[error("Duplicate node id: {0}")]
    DuplicateId(NodeId),
    #[error("Node {0} cannot move into its own subtree")]
    WouldCreateCycle(NodeId),
    #[error("Node {0} is locked")]
    Locked(NodeId),
    #[error("Nothing to group")]
    EmptyGroup,
    #[error("Grouped nodes must share a parent")]
    NotSiblings,
    #[error("Node {0} is not inside a tabs container")]
    NotInTabs(NodeId),
}

/// New value for a resized dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "camelCase")]
pub enum ResizeValue {
    /// A CSS length; blank input clears the field.
    Set(String),
    /// Fill the available space.
    Full,
    /// Fall back to the default.
    Clear,
}

impl ResizeValue {
    fn resolve(&self) -> Option<String> {
        match self {
            ResizeValue::Set(v) if v.trim().is_empty() => None,
            ResizeValue::Set(v) => Some(v.trim().to_string()),
            ResizeValue::Full => Some(FULL_SIZE.to_string()),
            ResizeValue::Clear => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReorderDirection {
    Up,
    Down,
}

/// A requested change to the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Intent {
    /// Detach the node at `from` and insert it at `to`. `to.index` counts
    /// positions in the target list after the node has been detached.
    Move { from: Location, to: Location },
    /// Insert `nodes` in order starting at `at`.
    Insert { at: Location, nodes: Vec<Node> },
    /// Remove a node together with its subtree.
    Remove { id: NodeId },
    /// Wrap sibling nodes in a new container with id `container`.
    Group {
        ids: Vec<NodeId>,
        kind: GroupKind,
        container: NodeId,
    },
    /// Replace a container with its children.
    Ungroup { id: NodeId },
    Resize {
        id: NodeId,
        field: DimensionField,
        value: ResizeValue,
    },
    /// Insert a fresh-id copy of a subtree right after the original.
    Duplicate { id: NodeId },
    /// Swap a node with its previous or next sibling.
    Reorder { id: NodeId, direction: ReorderDirection },
    /// Put a node in a tab panel of its `Tabs` parent, or take it out of
    /// any panel with `None`.
    AssignTab { id: NodeId, tab: Option<usize> },
}

impl Intent {
    /// Group intent with a freshly generated container id.
    pub fn group(ids: Vec<NodeId>, kind: GroupKind) -> Self {
        Intent::Group {
            ids,
            kind,
            container: NodeId::generate(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Intent::Move { .. } => "move",
            Intent::Insert { .. } => "insert",
            Intent::Remove { .. } => "remove",
            Intent::Group { .. } => "group",
            Intent::Ungroup { .. } => "ungroup",
            Intent::Resize { .. } => "resize",
            Intent::Duplicate { .. } => "duplicate",
            Intent::Reorder { .. } => "reorder",
            Intent::AssignTab { .. } => "assignTab",
        }
    }
}

/// What the reducer consults besides the tree itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct MutationContext<'a> {
    pub policy: PlacementPolicy,
    pub flags: Option<&'a EditorFlags>,
}

impl<'a> MutationContext<'a> {
    pub fn new(policy: PlacementPolicy) -> Self {
        Self { policy, flags: None }
    }

    pub fn with_flags(mut self, flags: &'a EditorFlags) -> Self {
        self.flags = Some(flags);
        self
    }

    fn is_locked(&self, id: &NodeId) -> bool {
        self.flags.is_some_and(|f| f.is_locked(id))
    }
}

/// Apply `intent`, or report why it was declined.
///
/// Intents that change nothing (reordering the first node up, moving a node
/// onto its own slot) return `tree` itself.
pub fn try_reduce(tree: &Tree, intent: &Intent, ctx: &MutationContext<'_>) -> Result<Tree, MutationError> {
    match intent {
        Intent::Move { from, to } => move_node(tree, from, to, ctx),
        Intent::Insert { at, nodes } => insert(tree, at, nodes, ctx),
        Intent::Remove { id } => remove(tree, id),
        Intent::Group {
            ids,
            kind,
            container,
        } => group(tree, ids, *kind, container, ctx),
        Intent::Ungroup { id } => ungroup(tree, id, ctx),
        Intent::Resize { id, field, value } => resize(tree, id, *field, value),
        Intent::Duplicate { id } => duplicate(tree, id),
        Intent::Reorder { id, direction } => reorder(tree, id, *direction),
        Intent::AssignTab { id, tab } => assign_tab(tree, id, *tab),
    }
}

/// Apply `intent`; a declined intent returns `tree` unchanged.
pub fn reduce(tree: &Tree, intent: &Intent, ctx: &MutationContext<'_>) -> Tree {
    match try_reduce(tree, intent, ctx) {
        Ok(next) => next,
        Err(e) => {
            log::debug!("Declined {} intent: {}", intent.name(), e);
            tree.clone()
        }
    }
}

fn parent_kind_of(tree: &Tree, parent: Option<&NodeId>) -> Result<ParentKind, MutationError> {
    let kind = match parent {
        None => return Ok(ParentKind::Root),
        Some(id) => tree
            .find_by_id(id)
            .ok_or_else(|| MutationError::ParentNotFound(id.clone()))?
            .kind(),
    };
    match parent {
        Some(id) if !kind.is_container() => Err(MutationError::NotAContainer(id.clone())),
        _ => Ok(ParentKind::Container(kind)),
    }
}

fn check_drop(parent: ParentKind, child: ComponentKind, ctx: &MutationContext<'_>) -> Result<(), MutationError> {
    if can_drop_child(parent, child, ctx.policy.sections_only) {
        Ok(())
    } else {
        Err(MutationError::PlacementRejected { parent, child })
    }
}

fn move_node(tree: &Tree, from: &Location, to: &Location, ctx: &MutationContext<'_>) -> Result<Tree, MutationError> {
    let siblings = tree
        .children_of(from.parent_id.as_ref())
        .ok_or_else(|| missing_parent(tree, from.parent_id.as_ref()))?;
    let moving = siblings
        .get(from.index)
        .cloned()
        .ok_or(MutationError::IndexOutOfRange {
            index: from.index,
            len: siblings.len(),
        })?;

    if ctx.is_locked(&moving.id) {
        return Err(MutationError::Locked(moving.id.clone()));
    }
    if let Some(target) = &to.parent_id
        && moving.find(target).is_some()
    {
        return Err(MutationError::WouldCreateCycle(moving.id.clone()));
    }

    let parent = parent_kind_of(tree, to.parent_id.as_ref())?;
    check_drop(parent, moving.kind(), ctx)?;

    if from.parent_id == to.parent_id && to.index.min(siblings.len() - 1) == from.index {
        return Ok(tree.clone());
    }

    let (detached, _) = tree.edit_children(from.parent_id.as_ref(), |kids| Ok(kids.remove(from.index)))?;
    let (next, _) = detached.edit_children(to.parent_id.as_ref(), |kids| {
        let index = to.index.min(kids.len());
        kids.insert(index, moving);
        Ok(())
    })?;
    Ok(next)
}

fn missing_parent(tree: &Tree, parent: Option<&NodeId>) -> MutationError {
    match parent {
        Some(id) if tree.contains(id) => MutationError::NotAContainer(id.clone()),
        Some(id) => MutationError::ParentNotFound(id.clone()),
        None => MutationError::IndexOutOfRange { index: 0, len: 0 },
    }
}

fn insert(tree: &Tree, at: &Location, nodes: &[Node], ctx: &MutationContext<'_>) -> Result<Tree, MutationError> {
    if nodes.is_empty() {
        return Ok(tree.clone());
    }
    let parent = parent_kind_of(tree, at.parent_id.as_ref())?;

    let mut seen: HashSet<NodeId> = tree.ids().into_iter().collect();
    for node in nodes {
        let mut ids = Vec::new();
        node.collect_ids(&mut ids);
        for id in ids {
            if !seen.insert(id.clone()) {
                return Err(MutationError::DuplicateId(id));
            }
        }
    }

    let refs: Vec<NodeRef> = nodes.iter().cloned().map(Arc::new).collect();
    let result = validate_placement(&refs, &ctx.policy.options(parent));
    if !result.is_ok() {
        return Err(MutationError::InvalidSubtree(result.errors().to_vec()));
    }

    let (next, _) = tree.edit_children(at.parent_id.as_ref(), |kids| {
        let index = at.index.min(kids.len());
        for (offset, node) in refs.into_iter().enumerate() {
            kids.insert(index + offset, node);
        }
        Ok(())
    })?;
    Ok(next)
}

fn remove(tree: &Tree, id: &NodeId) -> Result<Tree, MutationError> {
    let location = tree
        .locate(id)
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;
    let (next, _) = tree.edit_children(location.parent_id.as_ref(), |kids| {
        kids.remove(location.index);
        Ok(())
    })?;
    Ok(next)
}

fn group(
    tree: &Tree,
    ids: &[NodeId],
    kind: GroupKind,
    container: &NodeId,
    ctx: &MutationContext<'_>,
) -> Result<Tree, MutationError> {
    let mut positions = Vec::new();
    let mut parent_id: Option<Option<NodeId>> = None;
    for id in ids.iter().filter(|id| !ctx.is_locked(id)) {
        let location = tree
            .locate(id)
            .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;
        match &parent_id {
            None => parent_id = Some(location.parent_id.clone()),
            Some(p) if *p != location.parent_id => return Err(MutationError::NotSiblings),
            Some(_) => {}
        }
        if !positions.contains(&location.index) {
            positions.push(location.index);
        }
    }
    let parent_id = parent_id.ok_or(MutationError::EmptyGroup)?;
    positions.sort_unstable();

    if tree.contains(container) {
        return Err(MutationError::DuplicateId(container.clone()));
    }

    let container_kind = ComponentKind::from(kind);
    let parent = parent_kind_of(tree, parent_id.as_ref())?;
    check_drop(parent, container_kind, ctx)?;

    let siblings = tree.children_of(parent_id.as_ref()).unwrap_or(&[]);
    let members: Vec<NodeRef> = positions.iter().map(|&i| Arc::clone(&siblings[i])).collect();
    for member in &members {
        check_drop(ParentKind::Container(container_kind), member.kind(), ctx)?;
    }

    let wrapper = Arc::new(Node::with_props(container.clone(), Props::default_for(container_kind)).with_children(members));

    let (next, _) = tree.edit_children(parent_id.as_ref(), |kids| {
        for &index in positions.iter().rev() {
            kids.remove(index);
        }
        kids.insert(positions[0], wrapper);
        Ok(())
    })?;
    Ok(next)
}

fn ungroup(tree: &Tree, id: &NodeId, ctx: &MutationContext<'_>) -> Result<Tree, MutationError> {
    let node = tree
        .find_by_id(id)
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;
    if !node.is_container() {
        return Err(MutationError::NotAContainer(id.clone()));
    }
    let location = tree
        .locate(id)
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;
    let parent = parent_kind_of(tree, location.parent_id.as_ref())?;
    for child in node.children() {
        check_drop(parent, child.kind(), ctx)?;
    }

    match splice_out(tree.nodes(), id) {
        Some(roots) => Ok(Tree::from_refs(roots)),
        None => Ok(tree.clone()),
    }
}

/// Depth-first rewrite replacing the node `id` with its children. Returns
/// `None` when `id` is not in `nodes`, so callers can keep sharing the input.
fn splice_out(nodes: &[NodeRef], id: &NodeId) -> Option<Vec<NodeRef>> {
    let mut changed = false;
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        if &node.id == id {
            out.extend(node.children().iter().cloned());
            changed = true;
        } else if let Some(kids) = splice_out(node.children(), id) {
            out.push(Arc::new(node.with_children(kids)));
            changed = true;
        } else {
            out.push(Arc::clone(node));
        }
    }
    changed.then_some(out)
}

fn resize(tree: &Tree, id: &NodeId, field: DimensionField, value: &ResizeValue) -> Result<Tree, MutationError> {
    let location = tree
        .locate(id)
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;
    let node = tree
        .node_at(&location)
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;

    let value = value.resolve();
    if node.layout.get(field) == value.as_deref() {
        return Ok(tree.clone());
    }
    let mut patched = Node::clone(node);
    patched.layout.set(field, value);

    let (next, _) = tree.edit_children(location.parent_id.as_ref(), |kids| {
        kids[location.index] = Arc::new(patched);
        Ok(())
    })?;
    Ok(next)
}

fn duplicate(tree: &Tree, id: &NodeId) -> Result<Tree, MutationError> {
    let location = tree
        .locate(id)
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;
    let (next, _) = tree.edit_children(location.parent_id.as_ref(), |kids| {
        let copy = kids[location.index].clone_with_fresh_ids();
        kids.insert(location.index + 1, Arc::new(copy));
        Ok(())
    })?;
    Ok(next)
}

fn reorder(tree: &Tree, id: &NodeId, direction: ReorderDirection) -> Result<Tree, MutationError> {
    let location = tree
        .locate(id)
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;
    let len = tree
        .children_of(location.parent_id.as_ref())
        .map_or(0, <[NodeRef]>::len);
    let target = match direction {
        ReorderDirection::Up if location.index > 0 => location.index - 1,
        ReorderDirection::Down if location.index + 1 < len => location.index + 1,
        _ => return Ok(tree.clone()),
    };
    let (next, _) = tree.edit_children(location.parent_id.as_ref(), |kids| {
        kids.swap(location.index, target);
        Ok(())
    })?;
    Ok(next)
}

fn assign_tab(tree: &Tree, id: &NodeId, tab: Option<usize>) -> Result<Tree, MutationError> {
    let location = tree
        .locate(id)
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;
    let node = tree
        .node_at(&location)
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;
    if tab.is_some() && parent_kind_of(tree, location.parent_id.as_ref())? != ParentKind::Container(ComponentKind::Tabs) {
        return Err(MutationError::NotInTabs(id.clone()));
    }

    let slot_key = tab.map(|t| t.to_string());
    if node.slot_key == slot_key {
        return Ok(tree.clone());
    }
    let mut patched = Node::clone(node);
    patched.slot_key = slot_key;

    let (next, _) = tree.edit_children(location.parent_id.as_ref(), |kids| {
        kids[location.index] = Arc::new(patched);
        Ok(())
    })?;
    Ok(next)
}
