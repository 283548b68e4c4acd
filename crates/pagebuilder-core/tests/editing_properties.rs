//! End-to-end editing behaviour through the public API.

use kurbo::Point;
use pagebuilder_core::{
    ComponentKind, DragSource, DropTarget, EditorSession, GroupKind, HeadlessHost, History, Intent,
    LayoutConfig, Location, Modifiers, MutationContext, Node, NodeId, PageDocument, ParentKind,
    PlacementPolicy, PointerId, Tree, can_drop_child, reduce, validate_placement,
};
use pagebuilder_core::layout::GridCols;
use pagebuilder_core::placement::PlacementOptions;
use std::sync::Arc;

fn sample_tree() -> Tree {
    Tree::new(vec![Node::container(
        "a",
        ComponentKind::Section,
        vec![
            Node::of_kind("b", ComponentKind::Box),
            Node::container("c", ComponentKind::Section, vec![Node::of_kind("d", ComponentKind::Text)]),
        ],
    )])
}

fn child_ids(tree: &Tree, parent: &str) -> Vec<String> {
    tree.children_of(Some(&parent.into()))
        .unwrap_or(&[])
        .iter()
        .map(|n| n.id.as_str().to_string())
        .collect()
}

#[test]
fn test_commit_of_present_is_noop() {
    let mut history = History::new(sample_tree(), GridCols::default());
    history.commit(Tree::new(vec![]));
    let past_len = history.past().len();

    let present = history.present().clone();
    assert!(!history.commit(present));
    assert_eq!(history.past().len(), past_len);
    assert!(!history.can_redo());
}

#[test]
fn test_undo_redo_inverse() {
    let cols = GridCols::new(8).unwrap();
    let mut history = History::new(sample_tree(), cols);
    let ctx = MutationContext::default();

    let before = history.present().clone();
    let next = reduce(&before, &Intent::Remove { id: "b".into() }, &ctx);
    assert!(history.commit(next.clone()));

    assert!(history.undo());
    assert!(history.present().same(&before));
    assert_eq!(history.grid_cols(), cols);

    assert!(history.redo());
    assert!(history.present().same(&next));
    assert_eq!(history.grid_cols(), cols);
}

#[test]
fn test_group_then_ungroup_restores_siblings() {
    let tree = Tree::new(vec![Node::container(
        "s",
        ComponentKind::Section,
        vec![
            Node::of_kind("x", ComponentKind::Text),
            Node::of_kind("y", ComponentKind::Image),
            Node::of_kind("z", ComponentKind::Button),
        ],
    )]);
    let ctx = MutationContext::default();

    let grouped = reduce(
        &tree,
        &Intent::Group {
            ids: vec!["y".into(), "z".into()],
            kind: GroupKind::MultiColumn,
            container: "g".into(),
        },
        &ctx,
    );
    assert_eq!(child_ids(&grouped, "s"), vec!["x", "g"]);
    assert_eq!(child_ids(&grouped, "g"), vec!["y", "z"]);

    let restored = reduce(&grouped, &Intent::Ungroup { id: "g".into() }, &ctx);
    assert_eq!(restored, tree);
}

#[test]
fn test_sections_only_gate() {
    let text: Vec<Arc<Node>> = vec![Arc::new(Node::of_kind("t", ComponentKind::Text))];

    let strict = validate_placement(&text, &PlacementOptions::root(true));
    assert!(!strict.is_ok());
    assert_eq!(strict.issues()[0].path_string(), "0");

    assert!(validate_placement(&text, &PlacementOptions::root(false)).is_ok());
    assert!(!can_drop_child(ParentKind::Root, ComponentKind::Text, true));
    assert!(can_drop_child(ParentKind::Root, ComponentKind::Section, true));
}

#[test]
fn test_move_preserves_count_and_rejection_is_identity() {
    let tree = sample_tree();
    let ctx = MutationContext::new(PlacementPolicy::sections_only());

    let moved = reduce(
        &tree,
        &Intent::Move {
            from: Location::under("c", 0),
            to: Location::under("a", 0),
        },
        &ctx,
    );
    assert!(!moved.same(&tree));
    assert_eq!(moved.node_count(), tree.node_count());
    assert_eq!(child_ids(&moved, "a"), vec!["d", "b", "c"]);

    // A text block may not sit at the root of a sections-only page.
    let rejected = reduce(
        &tree,
        &Intent::Move {
            from: Location::under("a", 0),
            to: Location::root(0),
        },
        &ctx,
    );
    assert!(rejected.same(&tree));
}

#[test]
fn test_ungroup_nested_section() {
    let tree = sample_tree();
    let next = reduce(&tree, &Intent::Ungroup { id: "c".into() }, &MutationContext::default());

    let expected = Tree::new(vec![Node::container(
        "a",
        ComponentKind::Section,
        vec![
            Node::of_kind("b", ComponentKind::Box),
            Node::of_kind("d", ComponentKind::Text),
        ],
    )]);
    assert_eq!(next, expected);
    assert!(next.find_by_id(&NodeId::from("z")).is_none());
    // The untouched leaf is shared, not copied.
    assert!(Arc::ptr_eq(
        &tree.nodes()[0].children()[0],
        &next.nodes()[0].children()[0]
    ));
}

#[test]
fn test_drag_session_round_trip() {
    let doc = PageDocument::new(sample_tree(), LayoutConfig::default());
    let mut session = EditorSession::new(doc, PlacementPolicy::sections_only(), HeadlessHost::interactive());
    let pointer = PointerId(1);

    session.pointer_down(pointer, Point::new(5.0, 5.0), Modifiers::NONE, DragSource::Canvas { id: "b".into() });
    session.pointer_move(pointer, Point::new(5.0, 40.0), Some(DropTarget::inside("a", 2)));
    assert!(session.pointer_up(pointer, Point::new(5.0, 40.0), Some(DropTarget::inside("a", 2))));
    assert_eq!(child_ids(session.tree(), "a"), vec!["c", "b"]);
    assert_eq!(session.host().released, vec![pointer]);

    assert!(session.undo());
    assert_eq!(child_ids(session.tree(), "a"), vec!["b", "c"]);

    let json = session.to_page_document().to_json().unwrap();
    let reloaded = PageDocument::from_json(&json).unwrap();
    assert_eq!(&reloaded.components, session.tree());
}
