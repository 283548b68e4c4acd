//! Selection clicks and drag gestures, resolved into mutation intents.
//!
//! The coordinator never touches the tree. It reads the current snapshot to
//! decide what a drop means and hands back an [`Intent`] for the session to
//! dispatch.
//!
//! Pointer positions are canvas coordinates; hosts convert screen points
//! with [`CanvasState::screen_to_canvas`](crate::canvas::CanvasState::screen_to_canvas).

use crate::announce::Announcement;
use crate::input::{InputState, Modifiers, MouseButton, PointerEvent, PointerId};
use crate::layout::EditorFlags;
use crate::mutation::Intent;
use crate::node::{ComponentKind, Node, NodeId, Viewport};
use crate::placement::{ParentKind, PlacementPolicy, can_drop_child};
use crate::selection::SelectionState;
use crate::snap::snap_to_grid;
use crate::tree::{Location, Tree};
use kurbo::Point;
use thiserror::Error;

/// Distance in pixels the pointer must travel before a press becomes a drag.
pub const DRAG_ACTIVATION_DISTANCE: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("Pointer capture unavailable: {0}")]
    Unavailable(String),
}

/// Side effects the coordinator asks of the rendering layer.
pub trait SurfaceHost {
    /// Give keyboard focus to the element rendering `id`.
    fn focus(&mut self, id: &NodeId);

    /// Route further events for `pointer` to the element the gesture began on.
    fn capture_pointer(&mut self, pointer: PointerId, source: &DragSource) -> Result<(), CaptureError>;

    fn release_pointer(&mut self, pointer: PointerId);

    /// False in automated contexts, where capture is never requested.
    fn is_interactive(&self) -> bool {
        true
    }

    fn announce(&mut self, _announcement: Announcement) {}
}

/// Host for tests and headless runs. Records every request it receives.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    pub interactive: bool,
    /// Make every capture request fail.
    pub capture_fails: bool,
    pub focused: Vec<NodeId>,
    pub captured: Vec<PointerId>,
    pub released: Vec<PointerId>,
    pub announcements: Vec<Announcement>,
}

impl HeadlessHost {
    /// A non-interactive host.
    pub fn new() -> Self {
        Self::default()
    }

    /// A host that behaves like a live surface.
    pub fn interactive() -> Self {
        Self {
            interactive: true,
            ..Self::default()
        }
    }
}

impl SurfaceHost for HeadlessHost {
    fn focus(&mut self, id: &NodeId) {
        self.focused.push(id.clone());
    }

    fn capture_pointer(&mut self, pointer: PointerId, _source: &DragSource) -> Result<(), CaptureError> {
        if self.capture_fails {
            return Err(CaptureError::Unavailable("headless".to_string()));
        }
        self.captured.push(pointer);
        Ok(())
    }

    fn release_pointer(&mut self, pointer: PointerId) {
        self.released.push(pointer);
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn announce(&mut self, announcement: Announcement) {
        self.announcements.push(announcement);
    }
}

/// Where a drag started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    /// An existing node on the canvas.
    Canvas { id: NodeId },
    /// A new node of `kind` from the palette.
    Palette { kind: ComponentKind },
    /// Library templates, inserted as fresh-id copies in order.
    Library { templates: Vec<Node> },
}

impl DragSource {
    /// Kinds of the top-level nodes this source would place.
    fn kinds(&self, tree: &Tree) -> Vec<ComponentKind> {
        match self {
            DragSource::Canvas { id } => tree.find_by_id(id).map(|n| n.kind()).into_iter().collect(),
            DragSource::Palette { kind } => vec![*kind],
            DragSource::Library { templates } => templates.iter().map(Node::kind).collect(),
        }
    }
}

/// A drop slot reported by the host's hit testing. `visible_index` counts
/// only siblings shown on the current viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub parent_id: Option<NodeId>,
    pub visible_index: usize,
    /// Tab header under the pointer when the parent is a `Tabs` container.
    pub tab_index: Option<usize>,
}

impl DropTarget {
    pub fn root(visible_index: usize) -> Self {
        Self {
            parent_id: None,
            visible_index,
            tab_index: None,
        }
    }

    pub fn inside(parent: impl Into<NodeId>, visible_index: usize) -> Self {
        Self {
            parent_id: Some(parent.into()),
            visible_index,
            tab_index: None,
        }
    }

    pub fn on_tab(mut self, tab: usize) -> Self {
        self.tab_index = Some(tab);
        self
    }
}

/// Everything a drop decision reads.
#[derive(Debug, Clone, Copy)]
pub struct DropContext<'a> {
    pub tree: &'a Tree,
    pub flags: &'a EditorFlags,
    pub policy: PlacementPolicy,
    pub viewport: Viewport,
    /// Column width in canvas pixels; zero disables snapping.
    pub grid_size: f64,
}

/// Live drag feedback for the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct DragPreview {
    pub over: Option<DropTarget>,
    /// `None` while not over any target.
    pub allowed: Option<bool>,
    /// Pointer x snapped to the column grid.
    pub snap_x: Option<f64>,
}

/// What a finished gesture asks of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    None,
    /// Released before the drag activated; the selection has been updated.
    Clicked(NodeId),
    /// Dispatch `intent` and `follow_up` as one edit, then select `select`
    /// if given.
    Drop {
        intent: Intent,
        follow_up: Option<Intent>,
        select: Option<NodeId>,
    },
    /// The target does not accept `kind`.
    Rejected { kind: ComponentKind },
    /// Abandoned without a drop.
    Canceled,
}

#[derive(Debug, Clone)]
enum GestureState {
    Idle,
    Pressed {
        pointer: PointerId,
        source: DragSource,
        modifiers: Modifiers,
        captured: bool,
    },
    Dragging {
        pointer: PointerId,
        source: DragSource,
        captured: bool,
        preview: DragPreview,
    },
}

impl GestureState {
    fn pointer(&self) -> Option<PointerId> {
        match self {
            GestureState::Idle => None,
            GestureState::Pressed { pointer, .. } | GestureState::Dragging { pointer, .. } => Some(*pointer),
        }
    }
}

/// Owns the selection and turns clicks and drags into intents.
#[derive(Debug, Clone)]
pub struct Coordinator {
    selection: SelectionState,
    input: InputState,
    state: GestureState,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            selection: SelectionState::new(),
            input: InputState::new(),
            state: GestureState::Idle,
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Whether a press or drag is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    pub fn preview(&self) -> Option<&DragPreview> {
        match &self.state {
            GestureState::Dragging { preview, .. } => Some(preview),
            _ => None,
        }
    }

    /// A plain click selects `id` alone and focuses it; a modified click
    /// toggles it without moving focus.
    pub fn click<H: SurfaceHost + ?Sized>(&mut self, id: NodeId, modifiers: Modifiers, host: &mut H) {
        if modifiers.toggles_selection() {
            self.selection.toggle(id);
        } else {
            host.focus(&id);
            self.selection.select(id.clone());
            self.selection.set_focused(Some(id));
        }
    }

    pub fn pointer_down<H: SurfaceHost + ?Sized>(
        &mut self,
        pointer: PointerId,
        position: Point,
        modifiers: Modifiers,
        source: DragSource,
        host: &mut H,
    ) {
        if let Some(active) = self.state.pointer() {
            log::debug!("Ignoring pointer {:?} while {:?} is active", pointer, active);
            return;
        }
        self.input.handle_pointer_event(&PointerEvent::Down {
            pointer,
            position,
            button: MouseButton::Left,
            modifiers,
        });
        let captured = request_capture(pointer, &source, host);
        self.state = GestureState::Pressed {
            pointer,
            source,
            modifiers,
            captured,
        };
    }

    /// Track the pointer; `over` is the slot under it, if any. Returns true
    /// while a drag is active.
    pub fn pointer_move(
        &mut self,
        pointer: PointerId,
        position: Point,
        over: Option<DropTarget>,
        ctx: &DropContext<'_>,
    ) -> bool {
        if self.state.pointer() != Some(pointer) {
            return false;
        }
        self.input.handle_pointer_event(&PointerEvent::Move { pointer, position });

        let state = std::mem::replace(&mut self.state, GestureState::Idle);
        self.state = match state {
            GestureState::Pressed {
                pointer,
                source,
                captured,
                ..
            } if self.input.drag_distance() >= DRAG_ACTIVATION_DISTANCE => {
                let preview = preview_for(&source, over, position, ctx);
                GestureState::Dragging {
                    pointer,
                    source,
                    captured,
                    preview,
                }
            }
            GestureState::Dragging {
                pointer,
                source,
                captured,
                preview,
            } => {
                let preview = if preview.over == over {
                    DragPreview {
                        snap_x: snap_position(position, ctx),
                        ..preview
                    }
                } else {
                    preview_for(&source, over, position, ctx)
                };
                GestureState::Dragging {
                    pointer,
                    source,
                    captured,
                    preview,
                }
            }
            other => other,
        };
        self.is_dragging()
    }

    /// Finish the gesture. Capture is always released.
    pub fn pointer_up<H: SurfaceHost + ?Sized>(
        &mut self,
        pointer: PointerId,
        position: Point,
        over: Option<DropTarget>,
        ctx: &DropContext<'_>,
        host: &mut H,
    ) -> GestureOutcome {
        if self.state.pointer() != Some(pointer) {
            return GestureOutcome::None;
        }
        self.input.handle_pointer_event(&PointerEvent::Up { pointer, position });

        match std::mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Idle => GestureOutcome::None,
            GestureState::Pressed {
                source,
                modifiers,
                captured,
                ..
            } => {
                release(pointer, captured, host);
                match source {
                    DragSource::Canvas { id } if ctx.tree.contains(&id) => {
                        self.click(id.clone(), modifiers, host);
                        GestureOutcome::Clicked(id)
                    }
                    DragSource::Canvas { id } => {
                        log::debug!("Ignoring press on unknown node {}", id);
                        GestureOutcome::None
                    }
                    _ => GestureOutcome::None,
                }
            }
            GestureState::Dragging { source, captured, .. } => {
                release(pointer, captured, host);
                match over {
                    Some(target) => resolve_drop(source, &target, ctx),
                    None => GestureOutcome::Canceled,
                }
            }
        }
    }

    /// Abandon the active gesture without dropping. Returns false when there
    /// was nothing to cancel.
    pub fn cancel<H: SurfaceHost + ?Sized>(&mut self, host: &mut H) -> bool {
        let (pointer, captured) = match std::mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Idle => return false,
            GestureState::Pressed { pointer, captured, .. } | GestureState::Dragging { pointer, captured, .. } => {
                (pointer, captured)
            }
        };
        self.input.handle_pointer_event(&PointerEvent::Cancel { pointer });
        release(pointer, captured, host);
        true
    }
}

fn request_capture<H: SurfaceHost + ?Sized>(pointer: PointerId, source: &DragSource, host: &mut H) -> bool {
    if !host.is_interactive() {
        return false;
    }
    match host.capture_pointer(pointer, source) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("Dragging without pointer capture: {}", e);
            false
        }
    }
}

fn release<H: SurfaceHost + ?Sized>(pointer: PointerId, captured: bool, host: &mut H) {
    if captured {
        host.release_pointer(pointer);
    }
}

fn snap_position(position: Point, ctx: &DropContext<'_>) -> Option<f64> {
    (ctx.grid_size > 0.0).then(|| snap_to_grid(position.x, ctx.grid_size))
}

fn preview_for(source: &DragSource, over: Option<DropTarget>, position: Point, ctx: &DropContext<'_>) -> DragPreview {
    let allowed = over.as_ref().and_then(|target| {
        let kinds = source.kinds(ctx.tree);
        if kinds.is_empty() {
            None
        } else {
            Some(rejected_kind(source, &kinds, target, ctx).is_none())
        }
    });
    DragPreview {
        over,
        allowed,
        snap_x: snap_position(position, ctx),
    }
}

/// First dragged kind the target refuses, if any.
fn rejected_kind(
    source: &DragSource,
    kinds: &[ComponentKind],
    target: &DropTarget,
    ctx: &DropContext<'_>,
) -> Option<ComponentKind> {
    let first = kinds.first().copied()?;
    let parent = match ctx.tree.parent_kind(target.parent_id.as_ref()) {
        Some(ParentKind::Container(kind)) if !kind.is_container() => return Some(first),
        Some(parent) => parent,
        None => return Some(first),
    };
    if let (DragSource::Canvas { id }, Some(parent_id)) = (source, &target.parent_id)
        && ctx.tree.find_by_id(id).is_some_and(|n| n.find(parent_id).is_some())
    {
        return Some(first);
    }
    kinds
        .iter()
        .copied()
        .find(|kind| !can_drop_child(parent, *kind, ctx.policy.sections_only))
}

fn resolve_drop(source: DragSource, target: &DropTarget, ctx: &DropContext<'_>) -> GestureOutcome {
    let kinds = source.kinds(ctx.tree);
    if kinds.is_empty() {
        return GestureOutcome::None;
    }
    if let Some(kind) = rejected_kind(&source, &kinds, target, ctx) {
        return GestureOutcome::Rejected { kind };
    }
    let tab = target
        .tab_index
        .filter(|_| ctx.tree.parent_kind(target.parent_id.as_ref()) == Some(ParentKind::Container(ComponentKind::Tabs)));
    let siblings = ctx.tree.children_of(target.parent_id.as_ref()).unwrap_or(&[]);
    let index = ctx.flags.underlying_index(siblings, target.visible_index, ctx.viewport);
    let at = Location {
        parent_id: target.parent_id.clone(),
        index,
    };

    match source {
        DragSource::Canvas { id } => {
            let Some(from) = ctx.tree.locate(&id) else {
                return GestureOutcome::None;
            };
            let has_slot = ctx.tree.find_by_id(&id).is_some_and(|n| n.slot_key.is_some());
            let follow_up = match tab {
                Some(tab) => Some(Intent::AssignTab {
                    id: id.clone(),
                    tab: Some(tab),
                }),
                // Leaving a tab panel for a parent without tabs.
                None if has_slot && at.parent_id != from.parent_id => Some(Intent::AssignTab { id: id.clone(), tab: None }),
                None => None,
            };
            // Slots were counted with the dragged node still in place.
            let to = if from.parent_id == at.parent_id && from.index < at.index {
                Location {
                    index: at.index - 1,
                    ..at
                }
            } else {
                at
            };
            GestureOutcome::Drop {
                intent: Intent::Move { from, to },
                follow_up,
                select: None,
            }
        }
        DragSource::Palette { kind } => {
            let mut node = Node::new(kind);
            node.slot_key = tab.map(|t| t.to_string());
            let select = Some(node.id.clone());
            GestureOutcome::Drop {
                intent: Intent::Insert { at, nodes: vec![node] },
                follow_up: None,
                select,
            }
        }
        DragSource::Library { templates } => {
            let mut nodes: Vec<Node> = templates.iter().map(Node::clone_with_fresh_ids).collect();
            if let Some(tab) = tab {
                for node in &mut nodes {
                    node.slot_key = Some(tab.to_string());
                }
            }
            let select = nodes.first().map(|n| n.id.clone());
            GestureOutcome::Drop {
                intent: Intent::Insert { at, nodes },
                follow_up: None,
                select,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Tree {
        Tree::new(vec![
            Node::container(
                "s",
                ComponentKind::Section,
                vec![
                    Node::of_kind("x", ComponentKind::Text),
                    Node::of_kind("y", ComponentKind::Image),
                    Node::of_kind("z", ComponentKind::Button),
                ],
            ),
            Node::container("m", ComponentKind::MultiColumn, vec![]),
        ])
    }

    fn ctx<'a>(tree: &'a Tree, flags: &'a EditorFlags) -> DropContext<'a> {
        DropContext {
            tree,
            flags,
            policy: PlacementPolicy::default(),
            viewport: Viewport::Desktop,
            grid_size: 0.0,
        }
    }

    fn drag(
        coordinator: &mut Coordinator,
        source: DragSource,
        over: DropTarget,
        ctx: &DropContext<'_>,
        host: &mut HeadlessHost,
    ) -> GestureOutcome {
        let pointer = PointerId(1);
        coordinator.pointer_down(pointer, Point::new(0.0, 0.0), Modifiers::NONE, source, host);
        coordinator.pointer_move(pointer, Point::new(0.0, 20.0), Some(over.clone()), ctx);
        coordinator.pointer_up(pointer, Point::new(0.0, 20.0), Some(over), ctx, host)
    }

    #[test]
    fn test_plain_click_replaces_and_focuses() {
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::new();
        coordinator.click("x".into(), Modifiers::ctrl(), &mut host);
        coordinator.click("y".into(), Modifiers::NONE, &mut host);

        assert_eq!(coordinator.selection().ids().to_vec(), vec![NodeId::from("y")]);
        assert_eq!(host.focused, vec![NodeId::from("y")]);
        assert_eq!(coordinator.selection().focused(), Some(&NodeId::from("y")));
    }

    #[test]
    fn test_modified_click_toggles_without_focus() {
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::new();
        coordinator.click("x".into(), Modifiers::shift(), &mut host);
        coordinator.click("y".into(), Modifiers::ctrl(), &mut host);
        coordinator.click("x".into(), Modifiers::shift(), &mut host);

        assert_eq!(coordinator.selection().ids().to_vec(), vec![NodeId::from("y")]);
        assert!(host.focused.is_empty());
    }

    #[test]
    fn test_short_press_is_a_click() {
        let tree = tree();
        let flags = EditorFlags::new();
        let ctx = ctx(&tree, &flags);
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::new();
        let pointer = PointerId(1);

        coordinator.pointer_down(
            pointer,
            Point::new(10.0, 10.0),
            Modifiers::NONE,
            DragSource::Canvas { id: "y".into() },
            &mut host,
        );
        assert!(!coordinator.pointer_move(pointer, Point::new(13.0, 10.0), None, &ctx));
        let outcome = coordinator.pointer_up(pointer, Point::new(13.0, 10.0), None, &ctx, &mut host);

        assert_eq!(outcome, GestureOutcome::Clicked("y".into()));
        assert_eq!(coordinator.selection().single(), Some(&NodeId::from("y")));
    }

    #[test]
    fn test_press_on_removed_node_is_not_a_click() {
        let tree = tree();
        let flags = EditorFlags::new();
        let ctx = ctx(&tree, &flags);
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::new();
        let pointer = PointerId(1);

        coordinator.pointer_down(
            pointer,
            Point::new(10.0, 10.0),
            Modifiers::NONE,
            DragSource::Canvas { id: "gone".into() },
            &mut host,
        );
        let outcome = coordinator.pointer_up(pointer, Point::new(10.0, 10.0), None, &ctx, &mut host);

        assert_eq!(outcome, GestureOutcome::None);
        assert!(coordinator.selection().is_empty());
        assert!(!coordinator.is_active());
    }

    #[test]
    fn test_capture_suppressed_when_not_interactive() {
        let tree = tree();
        let flags = EditorFlags::new();
        let ctx = ctx(&tree, &flags);
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::new();

        drag(
            &mut coordinator,
            DragSource::Canvas { id: "x".into() },
            DropTarget::inside("s", 3),
            &ctx,
            &mut host,
        );
        assert!(host.captured.is_empty());
        assert!(host.released.is_empty());
    }

    #[test]
    fn test_capture_released_on_drop() {
        let tree = tree();
        let flags = EditorFlags::new();
        let ctx = ctx(&tree, &flags);
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::interactive();

        drag(
            &mut coordinator,
            DragSource::Canvas { id: "x".into() },
            DropTarget::inside("s", 3),
            &ctx,
            &mut host,
        );
        assert_eq!(host.captured, vec![PointerId(1)]);
        assert_eq!(host.released, vec![PointerId(1)]);
        assert!(!coordinator.is_active());
    }

    #[test]
    fn test_capture_failure_degrades() {
        let tree = tree();
        let flags = EditorFlags::new();
        let ctx = ctx(&tree, &flags);
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost {
            capture_fails: true,
            ..HeadlessHost::interactive()
        };

        let outcome = drag(
            &mut coordinator,
            DragSource::Canvas { id: "x".into() },
            DropTarget::inside("s", 3),
            &ctx,
            &mut host,
        );
        assert!(matches!(outcome, GestureOutcome::Drop { .. }));
        assert!(host.released.is_empty());
    }

    #[test]
    fn test_same_parent_move_adjusts_index() {
        let tree = tree();
        let flags = EditorFlags::new();
        let ctx = ctx(&tree, &flags);
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::new();

        let outcome = drag(
            &mut coordinator,
            DragSource::Canvas { id: "x".into() },
            DropTarget::inside("s", 3),
            &ctx,
            &mut host,
        );
        assert_eq!(
            outcome,
            GestureOutcome::Drop {
                intent: Intent::Move {
                    from: Location::under("s", 0),
                    to: Location::under("s", 2),
                },
                follow_up: None,
                select: None,
            }
        );
    }

    #[test]
    fn test_drop_maps_hidden_siblings() {
        let tree = tree();
        let mut flags = EditorFlags::new();
        flags.set_hidden(&"x".into(), Viewport::Desktop, true);
        let ctx = ctx(&tree, &flags);
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::new();

        let outcome = drag(
            &mut coordinator,
            DragSource::Palette {
                kind: ComponentKind::Divider,
            },
            DropTarget::inside("s", 1),
            &ctx,
            &mut host,
        );
        match outcome {
            GestureOutcome::Drop {
                intent: Intent::Insert { at, nodes },
                select,
                ..
            } => {
                assert_eq!(at, Location::under("s", 2));
                assert_eq!(nodes[0].kind(), ComponentKind::Divider);
                assert_eq!(select, Some(nodes[0].id.clone()));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_preview_and_rejected_drop() {
        let tree = tree();
        let flags = EditorFlags::new();
        let ctx = ctx(&tree, &flags);
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::new();
        let pointer = PointerId(1);

        coordinator.pointer_down(
            pointer,
            Point::new(0.0, 0.0),
            Modifiers::NONE,
            DragSource::Palette {
                kind: ComponentKind::Section,
            },
            &mut host,
        );
        coordinator.pointer_move(pointer, Point::new(0.0, 10.0), Some(DropTarget::inside("m", 0)), &ctx);
        assert_eq!(coordinator.preview().and_then(|p| p.allowed), Some(false));

        coordinator.pointer_move(pointer, Point::new(0.0, 12.0), Some(DropTarget::root(0)), &ctx);
        assert_eq!(coordinator.preview().and_then(|p| p.allowed), Some(true));

        let outcome = coordinator.pointer_up(pointer, Point::new(0.0, 12.0), Some(DropTarget::inside("m", 0)), &ctx, &mut host);
        assert_eq!(
            outcome,
            GestureOutcome::Rejected {
                kind: ComponentKind::Section
            }
        );
    }

    #[test]
    fn test_library_templates_get_fresh_ids() {
        let tree = tree();
        let flags = EditorFlags::new();
        let ctx = ctx(&tree, &flags);
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::new();

        let template = Node::container("tpl", ComponentKind::Section, vec![Node::of_kind("tpl-text", ComponentKind::Text)]);
        let outcome = drag(
            &mut coordinator,
            DragSource::Library {
                templates: vec![template],
            },
            DropTarget::root(2),
            &ctx,
            &mut host,
        );
        let GestureOutcome::Drop {
            intent: Intent::Insert { nodes, .. },
            ..
        } = outcome
        else {
            panic!("expected an insert");
        };
        assert_ne!(nodes[0].id, NodeId::from("tpl"));
        assert_ne!(nodes[0].children()[0].id, NodeId::from("tpl-text"));
    }

    #[test]
    fn test_drag_into_own_subtree_rejected() {
        let tree = tree();
        let flags = EditorFlags::new();
        let ctx = ctx(&tree, &flags);
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::new();

        let outcome = drag(
            &mut coordinator,
            DragSource::Canvas { id: "s".into() },
            DropTarget::inside("s", 0),
            &ctx,
            &mut host,
        );
        assert_eq!(
            outcome,
            GestureOutcome::Rejected {
                kind: ComponentKind::Section
            }
        );
    }

    #[test]
    fn test_cancel_releases_capture() {
        let tree = tree();
        let flags = EditorFlags::new();
        let ctx = ctx(&tree, &flags);
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::interactive();
        let pointer = PointerId(7);

        coordinator.pointer_down(
            pointer,
            Point::new(0.0, 0.0),
            Modifiers::NONE,
            DragSource::Canvas { id: "x".into() },
            &mut host,
        );
        coordinator.pointer_move(pointer, Point::new(30.0, 0.0), None, &ctx);
        assert!(coordinator.is_dragging());

        assert!(coordinator.cancel(&mut host));
        assert_eq!(host.released, vec![pointer]);
        assert!(!coordinator.cancel(&mut host));
    }

    #[test]
    fn test_drop_outside_targets_cancels() {
        let tree = tree();
        let flags = EditorFlags::new();
        let ctx = ctx(&tree, &flags);
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::new();
        let pointer = PointerId(1);

        coordinator.pointer_down(
            pointer,
            Point::new(0.0, 0.0),
            Modifiers::NONE,
            DragSource::Canvas { id: "x".into() },
            &mut host,
        );
        coordinator.pointer_move(pointer, Point::new(0.0, 50.0), None, &ctx);
        let outcome = coordinator.pointer_up(pointer, Point::new(0.0, 50.0), None, &ctx, &mut host);
        assert_eq!(outcome, GestureOutcome::Canceled);
    }

    fn tabs_tree() -> Tree {
        Tree::new(vec![Node::container(
            "s",
            ComponentKind::Section,
            vec![
                Node::of_kind("x", ComponentKind::Text),
                Node::container("tabs", ComponentKind::Tabs, vec![Node::of_kind("t", ComponentKind::Text)]),
            ],
        )])
    }

    #[test]
    fn test_palette_drop_on_tab_header() {
        let tree = tabs_tree();
        let flags = EditorFlags::new();
        let ctx = ctx(&tree, &flags);
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::new();

        let outcome = drag(
            &mut coordinator,
            DragSource::Palette {
                kind: ComponentKind::Button,
            },
            DropTarget::inside("tabs", 1).on_tab(2),
            &ctx,
            &mut host,
        );
        let GestureOutcome::Drop {
            intent: Intent::Insert { nodes, .. },
            follow_up: None,
            ..
        } = outcome
        else {
            panic!("expected an insert");
        };
        assert_eq!(nodes[0].tab_index(), Some(2));
    }

    #[test]
    fn test_tab_index_ignored_outside_tabs() {
        let tree = tabs_tree();
        let flags = EditorFlags::new();
        let ctx = ctx(&tree, &flags);
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::new();

        let template = Node::of_kind("tpl", ComponentKind::Text);
        let outcome = drag(
            &mut coordinator,
            DragSource::Library {
                templates: vec![template],
            },
            DropTarget::inside("s", 0).on_tab(1),
            &ctx,
            &mut host,
        );
        let GestureOutcome::Drop {
            intent: Intent::Insert { nodes, .. },
            ..
        } = outcome
        else {
            panic!("expected an insert");
        };
        assert_eq!(nodes[0].slot_key, None);
    }

    #[test]
    fn test_canvas_move_into_tab_assigns_slot() {
        let tree = tabs_tree();
        let flags = EditorFlags::new();
        let ctx = ctx(&tree, &flags);
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::new();

        let outcome = drag(
            &mut coordinator,
            DragSource::Canvas { id: "x".into() },
            DropTarget::inside("tabs", 0).on_tab(1),
            &ctx,
            &mut host,
        );
        assert_eq!(
            outcome,
            GestureOutcome::Drop {
                intent: Intent::Move {
                    from: Location::under("s", 0),
                    to: Location::under("tabs", 0),
                },
                follow_up: Some(Intent::AssignTab {
                    id: "x".into(),
                    tab: Some(1),
                }),
                select: None,
            }
        );
    }

    #[test]
    fn test_preview_snaps_to_grid() {
        let tree = tree();
        let flags = EditorFlags::new();
        let ctx = DropContext {
            grid_size: 100.0,
            ..ctx(&tree, &flags)
        };
        let mut coordinator = Coordinator::new();
        let mut host = HeadlessHost::new();
        let pointer = PointerId(1);

        coordinator.pointer_down(
            pointer,
            Point::new(0.0, 0.0),
            Modifiers::NONE,
            DragSource::Canvas { id: "x".into() },
            &mut host,
        );
        coordinator.pointer_move(pointer, Point::new(140.0, 0.0), Some(DropTarget::inside("s", 3)), &ctx);
        assert_eq!(coordinator.preview().and_then(|p| p.snap_x), Some(100.0));

        // Same target, new position.
        coordinator.pointer_move(pointer, Point::new(260.0, 0.0), Some(DropTarget::inside("s", 3)), &ctx);
        assert_eq!(coordinator.preview().and_then(|p| p.snap_x), Some(300.0));
    }
}
