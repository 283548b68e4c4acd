//! Page component nodes.

mod kind;
mod props;

pub use kind::{ComponentKind, GroupKind, KindCategory};
pub use props::{
    BoxProps, ButtonProps, ColumnProps, Dimension, DimensionField, Dimensions, DividerProps,
    FULL_SIZE, FlexDirection, GridProps, ImageProps, Locale, LocalizedText, MultiColumnProps,
    ProductGridProps, Props, RepeaterProps, Responsive, SectionProps, SpacerProps,
    StackFlexProps, TabsProps, TextProps, VideoProps, Viewport,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Opaque node identifier, stable across edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh, process-unique id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared handle to an immutable node. Untouched subtrees are shared between
/// successive trees rather than copied.
pub type NodeRef = Arc<Node>;

/// A single component in the page tree.
///
/// `children` is `Some` exactly when the kind is a container; leaf kinds carry
/// `None`, which placement and validation rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(flatten)]
    pub props: Props,
    #[serde(default, skip_serializing_if = "Dimensions::is_empty")]
    pub layout: Dimensions,
    /// Tab panel this node belongs to when its parent is a `Tabs` container.
    #[serde(default, rename = "slotKey", skip_serializing_if = "Option::is_none")]
    pub slot_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeRef>>,
}

impl Node {
    /// A node of `kind` with default props and a generated id.
    pub fn new(kind: ComponentKind) -> Self {
        Self::with_props(NodeId::generate(), Props::default_for(kind))
    }

    /// A node with the given id and props; containers start with no children.
    pub fn with_props(id: NodeId, props: Props) -> Self {
        let children = props.kind().is_container().then(Vec::new);
        Self {
            id,
            props,
            layout: Dimensions::default(),
            slot_key: None,
            children,
        }
    }

    /// Leaf or empty container of `kind` with a caller-chosen id.
    pub fn of_kind(id: impl Into<NodeId>, kind: ComponentKind) -> Self {
        Self::with_props(id.into(), Props::default_for(kind))
    }

    /// Container of `kind` holding `children`.
    pub fn container(id: impl Into<NodeId>, kind: ComponentKind, children: Vec<Node>) -> Self {
        Self::of_kind(id, kind).with_children(children.into_iter().map(Arc::new).collect())
    }

    pub fn kind(&self) -> ComponentKind {
        self.props.kind()
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// Children in order; empty for leaves.
    pub fn children(&self) -> &[NodeRef] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Copy of this node with its child list replaced. A non-empty
    /// multi-column container gets one column per child.
    pub fn with_children(&self, children: Vec<NodeRef>) -> Node {
        let mut props = self.props.clone();
        if let Props::MultiColumn(mc) = &mut props
            && !children.is_empty()
        {
            mc.columns = Some(u8::try_from(children.len()).unwrap_or(u8::MAX));
        }
        Node {
            id: self.id.clone(),
            props,
            layout: self.layout.clone(),
            slot_key: self.slot_key.clone(),
            children: Some(children),
        }
    }

    /// Tab panel index parsed from `slot_key`.
    pub fn tab_index(&self) -> Option<usize> {
        self.slot_key.as_deref().and_then(|key| key.parse().ok())
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(|c| c.subtree_len()).sum::<usize>()
    }

    /// Find a node by id within this subtree (including this node).
    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        if &self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(id))
    }

    /// Collect every id in this subtree, pre-order.
    pub fn collect_ids(&self, out: &mut Vec<NodeId>) {
        out.push(self.id.clone());
        for child in self.children() {
            child.collect_ids(out);
        }
    }

    /// Deep copy with a fresh id on every node of the subtree.
    pub fn clone_with_fresh_ids(&self) -> Node {
        Node {
            id: NodeId::generate(),
            props: self.props.clone(),
            layout: self.layout.clone(),
            slot_key: self.slot_key.clone(),
            children: self.children.as_ref().map(|kids| {
                kids.iter()
                    .map(|c| Arc::new(c.clone_with_fresh_ids()))
                    .collect()
            }),
        }
    }
}

/// Give every container in the subtree a `children` list. Returns the input
/// handle untouched when nothing needed fixing.
pub fn normalize(node: &NodeRef) -> NodeRef {
    let needs_list = node.is_container() && node.children.is_none();
    let kids = node.children();
    let fixed: Vec<NodeRef> = kids.iter().map(normalize).collect();
    let kids_changed = fixed
        .iter()
        .zip(kids)
        .any(|(new, old)| !Arc::ptr_eq(new, old));

    if needs_list || kids_changed {
        Arc::new(node.with_children(fixed))
    } else {
        Arc::clone(node)
    }
}
