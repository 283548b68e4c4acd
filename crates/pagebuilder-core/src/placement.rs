//! Placement rules: which component kinds may live under which parents.
//!
//! Everything here is pure. Validation never touches its input and reports
//! every violation it finds rather than stopping at the first.

use crate::node::{ComponentKind, KindCategory, Node, NodeId, NodeRef};
use crate::tree::Tree;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Deepest nesting a document may reach, counted from a root node at depth 0.
pub const MAX_NESTING_DEPTH: usize = 8;

/// Context a placement is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentKind {
    /// The page's root list.
    Root,
    /// Children of a node of this kind.
    Container(ComponentKind),
}

impl fmt::Display for ParentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentKind::Root => f.write_str("ROOT"),
            ParentKind::Container(kind) => write!(f, "{kind}"),
        }
    }
}

/// Page-type policy consulted by every placement decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementPolicy {
    /// Restrict the page root to sectioning containers.
    #[serde(default)]
    pub sections_only: bool,
}

impl PlacementPolicy {
    pub fn sections_only() -> Self {
        Self {
            sections_only: true,
        }
    }

    pub fn options(self, parent: ParentKind) -> PlacementOptions {
        PlacementOptions {
            parent,
            sections_only: self.sections_only,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementOptions {
    pub parent: ParentKind,
    pub sections_only: bool,
}

impl PlacementOptions {
    pub fn root(sections_only: bool) -> Self {
        Self {
            parent: ParentKind::Root,
            sections_only,
        }
    }

    pub fn inside(kind: ComponentKind) -> Self {
        Self {
            parent: ParentKind::Container(kind),
            sections_only: false,
        }
    }
}

/// One step of an issue path: a list index or a field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl PathSegment {
    fn children() -> Self {
        PathSegment::Key("children".to_string())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{i}"),
            PathSegment::Key(k) => f.write_str(k),
        }
    }
}

/// A single violation and where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl Issue {
    fn new(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Path rendered as `0.children.1`.
    pub fn path_string(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Outcome of a placement or document check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid {
        /// One human-readable line per issue.
        errors: Vec<String>,
        issues: Vec<Issue>,
    },
}

impl ValidationResult {
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        if issues.is_empty() {
            return ValidationResult::Valid;
        }
        let errors = issues.iter().map(|i| i.message.clone()).collect();
        ValidationResult::Invalid { errors, issues }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> &[String] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid { errors, .. } => errors,
        }
    }

    pub fn issues(&self) -> &[Issue] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid { issues, .. } => issues,
        }
    }
}

/// Static containment table for container parents.
pub fn accepts(parent: ComponentKind, child: ComponentKind) -> bool {
    use ComponentKind as K;
    match parent {
        K::Section => child != K::Column,
        K::MultiColumn => child.is_column_like(),
        K::Tabs => !matches!(child, K::Tabs | K::Column),
        K::Column | K::StackFlex | K::Grid | K::Repeater => match child.category() {
            KindCategory::Layout => child != K::Column,
            KindCategory::Content => true,
            KindCategory::Sectioning => false,
        },
        _ => false,
    }
}

/// Whether a node of kind `child` may be dropped into `parent` right now.
pub fn can_drop_child(parent: ParentKind, child: ComponentKind, sections_only: bool) -> bool {
    match parent {
        ParentKind::Root if sections_only => child.is_top_level_section(),
        ParentKind::Root => child != ComponentKind::Column,
        ParentKind::Container(kind) => {
            debug_assert!(kind.is_container(), "leaf kind {kind} used as a parent");
            accepts(kind, child)
        }
    }
}

/// Check `nodes` (and their subtrees) against a parent context.
pub fn validate_placement(nodes: &[NodeRef], options: &PlacementOptions) -> ValidationResult {
    let mut issues = Vec::new();
    check_list(nodes, options, &[], &mut issues);
    ValidationResult::from_issues(issues)
}

/// Single-node convenience for [`validate_placement`].
pub fn validate_node(node: &Node, options: &PlacementOptions) -> ValidationResult {
    let mut issues = Vec::new();
    check_node(node, 0, options, &[], &mut issues);
    ValidationResult::from_issues(issues)
}

/// Validate a whole page: placement at every level, unique ids, leaves
/// without children, and nesting depth.
pub fn validate_document(tree: &Tree, policy: PlacementPolicy) -> ValidationResult {
    let mut issues = Vec::new();
    check_list(tree.nodes(), &policy.options(ParentKind::Root), &[], &mut issues);

    let mut seen = HashSet::new();
    for (index, root) in tree.nodes().iter().enumerate() {
        check_unique(root, vec![PathSegment::Index(index)], &mut seen, &mut issues);
        if depth_of(root) > MAX_NESTING_DEPTH {
            issues.push(Issue::new(
                vec![PathSegment::Index(index)],
                format!("Nesting depth exceeds {MAX_NESTING_DEPTH} levels."),
            ));
        }
    }
    ValidationResult::from_issues(issues)
}

fn check_list(
    nodes: &[NodeRef],
    options: &PlacementOptions,
    prefix: &[PathSegment],
    issues: &mut Vec<Issue>,
) {
    for (index, node) in nodes.iter().enumerate() {
        check_node(node, index, options, prefix, issues);
    }
}

fn check_node(
    node: &Node,
    index: usize,
    options: &PlacementOptions,
    prefix: &[PathSegment],
    issues: &mut Vec<Issue>,
) {
    let mut path = prefix.to_vec();
    path.push(PathSegment::Index(index));
    let kind = node.kind();

    match options.parent {
        ParentKind::Container(parent) if !parent.is_container() => {
            issues.push(Issue::new(
                path.clone(),
                format!("Component '{parent}' cannot have children; only containers may own children."),
            ));
        }
        ParentKind::Root if options.sections_only && !kind.is_top_level_section() => {
            issues.push(Issue::new(
                path.clone(),
                format!("Only sections may be placed at the page root; found '{kind}'."),
            ));
        }
        parent => {
            if !can_drop_child(parent, kind, options.sections_only) {
                issues.push(Issue::new(
                    path.clone(),
                    format!("'{kind}' cannot be placed inside '{parent}'."),
                ));
            }
        }
    }

    match &node.children {
        Some(kids) if !kind.is_container() => {
            if !kids.is_empty() {
                let mut at = path;
                at.push(PathSegment::children());
                issues.push(Issue::new(
                    at,
                    format!("Component '{kind}' cannot have children; only containers may own children."),
                ));
            }
        }
        Some(kids) => {
            path.push(PathSegment::children());
            check_list(kids, &PlacementOptions::inside(kind), &path, issues);
        }
        None => {}
    }
}

fn check_unique(
    node: &Node,
    path: Vec<PathSegment>,
    seen: &mut HashSet<NodeId>,
    issues: &mut Vec<Issue>,
) {
    if !seen.insert(node.id.clone()) {
        issues.push(Issue::new(path.clone(), format!("Duplicate component id '{}'.", node.id)));
    }
    for (index, child) in node.children().iter().enumerate() {
        let mut at = path.clone();
        at.push(PathSegment::children());
        at.push(PathSegment::Index(index));
        check_unique(child, at, seen, issues);
    }
}

/// Depth of the deepest node below `node`, where `node` itself is 0.
fn depth_of(node: &Node) -> usize {
    node.children()
        .iter()
        .map(|c| 1 + depth_of(c))
        .max()
        .unwrap_or(0)
}
