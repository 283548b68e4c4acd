//! One editing session: the live document, its history, and everything that
//! feeds intents into it.

use crate::announce::Announcement;
use crate::canvas::CanvasState;
use crate::document::PageDocument;
use crate::gesture::{Coordinator, DragSource, DropContext, DropTarget, GestureOutcome, SurfaceHost};
use crate::history::History;
use crate::input::{KeyEvent, Modifiers, PointerId};
use crate::layout::{ConfigError, EditorFlags, GridCols, LayoutConfig};
use crate::mutation::{
    Intent, MutationContext, MutationError, ReorderDirection, ResizeValue, reduce, try_reduce,
};
use crate::node::{Dimension, DimensionField, GroupKind, NodeId, Viewport};
use crate::placement::PlacementPolicy;
use crate::selection::SelectionState;
use crate::shortcuts::{Command, NudgeStep, ShortcutRegistry, ZOrderChange};
use crate::signals::{SignalReceiver, SignalSender, StructureSignal, signal_channel};
use crate::snap::column_width;
use crate::tree::{Location, Tree};
use kurbo::Point;

/// Z-index given to blocks brought to the front.
const FRONT_Z_INDEX: i32 = 999;

/// Owns the present tree and selection for a single page being edited.
///
/// Intents are applied strictly in the order they are dispatched. Nothing
/// here blocks; every call runs to completion before returning.
pub struct EditorSession<H: SurfaceHost> {
    history: History,
    layout: LayoutConfig,
    flags: EditorFlags,
    policy: PlacementPolicy,
    coordinator: Coordinator,
    canvas: CanvasState,
    sender: SignalSender,
    /// Dropped on teardown, after which every send fails.
    signals: Option<SignalReceiver>,
    host: H,
}

impl<H: SurfaceHost> EditorSession<H> {
    pub fn new(document: PageDocument, policy: PlacementPolicy, host: H) -> Self {
        let PageDocument {
            components,
            layout,
            editor,
        } = document;
        let tree = components.normalized();
        let mut canvas = CanvasState::new();
        canvas.refresh(&tree, policy);
        let (sender, receiver) = signal_channel();

        log::info!(
            "Editing session started: {} nodes, {} grid columns",
            tree.node_count(),
            layout.grid_cols.get()
        );

        Self {
            history: History::new(tree, layout.grid_cols),
            layout,
            flags: editor,
            policy,
            coordinator: Coordinator::new(),
            canvas,
            sender,
            signals: Some(receiver),
            host,
        }
    }

    /// Bound the undo stack.
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history = self.history.with_limit(limit);
        self
    }

    pub fn tree(&self) -> &Tree {
        self.history.present()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn policy(&self) -> PlacementPolicy {
        self.policy
    }

    pub fn selection(&self) -> &SelectionState {
        self.coordinator.selection()
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    /// Device preview, zoom, locale, and progress. Validity is maintained
    /// by the session and refreshed after every change.
    pub fn canvas_mut(&mut self) -> &mut CanvasState {
        &mut self.canvas
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // --- Mutations ---

    /// Apply `intent` and record it in history. Returns false when the
    /// intent was declined or changed nothing.
    pub fn dispatch(&mut self, intent: &Intent) -> bool {
        let ctx = MutationContext::new(self.policy).with_flags(&self.flags);
        let next = reduce(self.history.present(), intent, &ctx);
        self.commit(next, Announcement::from(intent))
    }

    /// Like [`dispatch`](Self::dispatch), but reports why an intent was
    /// declined.
    pub fn try_dispatch(&mut self, intent: &Intent) -> Result<bool, MutationError> {
        let ctx = MutationContext::new(self.policy).with_flags(&self.flags);
        let next = try_reduce(self.history.present(), intent, &ctx)?;
        Ok(self.commit(next, Announcement::from(intent)))
    }

    /// Apply several intents as one undo step. Intents that are declined
    /// along the way are skipped; the announcement follows the first intent
    /// that changed the tree.
    pub fn dispatch_all(&mut self, intents: &[Intent]) -> bool {
        self.apply_batch(intents, None)
    }

    /// Fold `intents` into one commit, announced with `announcement` or else
    /// derived from the first intent that took effect.
    fn apply_batch(&mut self, intents: &[Intent], announcement: Option<Announcement>) -> bool {
        let ctx = MutationContext::new(self.policy).with_flags(&self.flags);
        let mut tree = self.history.present().clone();
        let mut applied = None;
        for intent in intents {
            let next = reduce(&tree, intent, &ctx);
            if !next.same(&tree) {
                applied.get_or_insert(intent);
                tree = next;
            }
        }
        let Some(first) = applied else {
            return false;
        };
        let announcement = announcement.unwrap_or_else(|| Announcement::from(first));
        self.commit(tree, announcement)
    }

    fn commit(&mut self, next: Tree, announcement: Announcement) -> bool {
        if !self.history.commit(next) {
            return false;
        }
        self.after_change();
        self.host.announce(announcement);
        true
    }

    fn after_change(&mut self) {
        let tree = self.history.present();
        self.canvas.refresh(tree, self.policy);
        self.coordinator.selection_mut().retain_existing(tree);
    }

    pub fn undo(&mut self) -> bool {
        if !self.history.undo() {
            return false;
        }
        self.after_change();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.redo() {
            return false;
        }
        self.after_change();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn resize(&mut self, id: NodeId, field: DimensionField, value: ResizeValue) -> bool {
        self.dispatch(&Intent::Resize { id, field, value })
    }

    // --- Selection-driven commands ---

    /// Wrap the selected siblings in a new container and select it.
    pub fn group_selected(&mut self, kind: GroupKind) -> bool {
        let ids = self.selection().ids().to_vec();
        if ids.is_empty() {
            return false;
        }
        let intent = Intent::group(ids, kind);
        let changed = self.dispatch(&intent);
        if changed && let Intent::Group { container, .. } = intent {
            self.coordinator.selection_mut().select(container);
        }
        changed
    }

    /// Dissolve the selected container and select what it held.
    pub fn ungroup_selected(&mut self) -> bool {
        let Some(id) = self.selection().single().cloned() else {
            return false;
        };
        let released: Vec<NodeId> = self
            .tree()
            .find_by_id(&id)
            .map(|n| n.children().iter().map(|c| c.id.clone()).collect())
            .unwrap_or_default();
        let changed = self.dispatch(&Intent::Ungroup { id });
        if changed {
            self.coordinator.selection_mut().select_all(released);
        }
        changed
    }

    /// Remove every selected node in one undo step.
    pub fn delete_selected(&mut self) -> bool {
        let intents: Vec<Intent> = self
            .selection()
            .ids()
            .iter()
            .map(|id| Intent::Remove { id: id.clone() })
            .collect();
        self.dispatch_all(&intents)
    }

    /// Duplicate the selected node and select the copy.
    pub fn duplicate_selected(&mut self) -> bool {
        let Some(id) = self.selection().single().cloned() else {
            return false;
        };
        if !self.dispatch(&Intent::Duplicate { id: id.clone() }) {
            return false;
        }
        let copy = self.tree().locate(&id).and_then(|at| {
            let next = Location {
                index: at.index + 1,
                ..at
            };
            self.tree().node_at(&next).map(|n| n.id.clone())
        });
        if let Some(copy) = copy {
            self.coordinator.selection_mut().select(copy);
        }
        true
    }

    pub fn reorder_selected(&mut self, direction: ReorderDirection) -> bool {
        match self.selection().single().cloned() {
            Some(id) => self.dispatch(&Intent::Reorder { id, direction }),
            None => false,
        }
    }

    /// Shift the selected blocks' left/top offsets for the current device.
    /// Locked blocks stay put; offsets never go below zero.
    pub fn nudge_selected(&mut self, dx: i8, dy: i8, step: NudgeStep) -> bool {
        let amount = match step {
            NudgeStep::Pixel => 1.0,
            NudgeStep::Large => 10.0,
            NudgeStep::Column => self.grid_size(),
        };
        let viewport = self.canvas.viewport();
        let intents: Vec<Intent> = self
            .selection()
            .ids()
            .iter()
            .filter(|id| !self.flags.is_locked(id))
            .filter_map(|id| self.tree().find_by_id(id))
            .flat_map(|node| {
                [(Dimension::Left, dx), (Dimension::Top, dy)]
                    .into_iter()
                    .filter(|(_, delta)| *delta != 0)
                    .map(move |(dimension, delta)| {
                        let current = node.layout.dimension(dimension).effective(viewport);
                        Intent::Resize {
                            id: node.id.clone(),
                            field: DimensionField::for_viewport(dimension, viewport),
                            value: ResizeValue::Set(offset_px(current, f64::from(delta) * amount)),
                        }
                    })
            })
            .collect();
        self.apply_batch(&intents, Some(Announcement::BlockMoved))
    }

    /// Restack the selected blocks. Returns false with nothing selected.
    pub fn change_z_order(&mut self, change: ZOrderChange) -> bool {
        let ids = self.selection().ids().to_vec();
        if ids.is_empty() {
            return false;
        }
        for id in &ids {
            let current = self.flags.z_index(id).unwrap_or(0);
            let next = match change {
                ZOrderChange::Forward => current.saturating_add(1),
                ZOrderChange::Backward => current.saturating_sub(1).max(0),
                ZOrderChange::Front => FRONT_Z_INDEX,
                ZOrderChange::Back => 0,
            };
            self.flags.set_z_index(id, Some(next));
        }
        self.host.announce(match change {
            ZOrderChange::Forward => Announcement::BroughtForward,
            ZOrderChange::Backward => Announcement::SentBackward,
            ZOrderChange::Front => Announcement::BroughtToFront,
            ZOrderChange::Back => Announcement::SentToBack,
        });
        true
    }

    pub fn rotate_device(&mut self) -> bool {
        self.canvas.rotate();
        true
    }

    // --- Pointer gestures ---

    /// Click on a rendered node outside of a drag.
    pub fn click(&mut self, id: NodeId, modifiers: Modifiers) {
        if !self.tree().contains(&id) {
            log::debug!("Ignoring click on unknown node {}", id);
            return;
        }
        self.coordinator.click(id, modifiers, &mut self.host);
    }

    pub fn pointer_down(&mut self, pointer: PointerId, position: Point, modifiers: Modifiers, source: DragSource) {
        self.coordinator
            .pointer_down(pointer, position, modifiers, source, &mut self.host);
    }

    /// Returns true while a drag is active.
    pub fn pointer_move(&mut self, pointer: PointerId, position: Point, over: Option<DropTarget>) -> bool {
        let ctx = DropContext {
            tree: self.history.present(),
            flags: &self.flags,
            policy: self.policy,
            viewport: self.canvas.viewport(),
            grid_size: self.grid_size(),
        };
        self.coordinator.pointer_move(pointer, position, over, &ctx)
    }

    /// Finish the gesture. Returns true when a drop changed the tree.
    pub fn pointer_up(&mut self, pointer: PointerId, position: Point, over: Option<DropTarget>) -> bool {
        let ctx = DropContext {
            tree: self.history.present(),
            flags: &self.flags,
            policy: self.policy,
            viewport: self.canvas.viewport(),
            grid_size: self.grid_size(),
        };
        let outcome = self
            .coordinator
            .pointer_up(pointer, position, over, &ctx, &mut self.host);
        self.apply_outcome(outcome)
    }

    fn apply_outcome(&mut self, outcome: GestureOutcome) -> bool {
        match outcome {
            GestureOutcome::None | GestureOutcome::Clicked(_) => false,
            GestureOutcome::Drop {
                intent,
                follow_up,
                select,
            } => {
                let announcement = match &follow_up {
                    Some(assign @ Intent::AssignTab { tab: Some(_), .. }) => Some(Announcement::from(assign)),
                    _ => None,
                };
                let intents: Vec<Intent> = std::iter::once(intent).chain(follow_up).collect();
                let changed = self.apply_batch(&intents, announcement);
                if changed && let Some(id) = select {
                    self.coordinator.selection_mut().select(id);
                }
                changed
            }
            GestureOutcome::Rejected { kind } => {
                self.host.announce(Announcement::CannotPlace { kind });
                false
            }
            GestureOutcome::Canceled => {
                self.host.announce(Announcement::Canceled);
                false
            }
        }
    }

    /// Abandon the active gesture. History is untouched.
    pub fn cancel_gesture(&mut self) -> bool {
        if !self.coordinator.cancel(&mut self.host) {
            return false;
        }
        self.host.announce(Announcement::Canceled);
        true
    }

    /// Run the commands bound to `event` in order until one does
    /// something. Returns true if any did.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        ShortcutRegistry::matching(event)
            .into_iter()
            .any(|command| self.run_command(command))
    }

    fn run_command(&mut self, command: Command) -> bool {
        match command {
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::Group(kind) => self.group_selected(kind),
            Command::Ungroup => self.ungroup_selected(),
            Command::Duplicate => self.duplicate_selected(),
            Command::Delete => self.delete_selected(),
            Command::Reorder(direction) => self.reorder_selected(direction),
            Command::Cancel => self.cancel_gesture(),
            Command::Nudge { dx, dy, step } => self.nudge_selected(dx, dy, step),
            Command::ZOrder(change) => self.change_z_order(change),
            Command::RotateDevice => self.rotate_device(),
        }
    }

    // --- Structure signals ---

    /// A sender for toolbar controls. Sends fail once the session ends.
    pub fn signal_sender(&self) -> SignalSender {
        self.sender.clone()
    }

    pub fn is_subscribed(&self) -> bool {
        self.signals.is_some()
    }

    /// Apply pending structure signals in order. Returns true if any of
    /// them changed the tree.
    pub fn poll_signals(&mut self) -> bool {
        let pending = match &self.signals {
            Some(receiver) => receiver.poll(),
            None => return false,
        };
        let mut changed = false;
        for signal in pending {
            changed |= match signal {
                StructureSignal::Group { kind } => {
                    if self.selection().is_empty() {
                        log::warn!("Group signal ignored: nothing selected");
                        false
                    } else {
                        self.group_selected(kind)
                    }
                }
                StructureSignal::Ungroup => {
                    if self.selection().single().is_none() {
                        log::warn!("Ungroup signal ignored: select exactly one container");
                        false
                    } else {
                        self.ungroup_selected()
                    }
                }
            };
        }
        changed
    }

    // --- Layout and editor flags ---

    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig {
            grid_cols: self.history.grid_cols(),
            breakpoints: self.layout.breakpoints.clone(),
        }
    }

    /// Change the grid. Not recorded in history.
    pub fn set_grid_cols(&mut self, cols: u8) -> Result<(), ConfigError> {
        let cols = GridCols::new(cols)?;
        self.history.set_grid_cols(cols);
        self.layout.grid_cols = cols;
        Ok(())
    }

    pub fn set_layout(&mut self, layout: LayoutConfig) -> Result<(), ConfigError> {
        layout.validate()?;
        self.history.set_grid_cols(layout.grid_cols);
        self.layout = layout;
        Ok(())
    }

    /// Width of one grid column on the current preview frame.
    pub fn grid_size(&self) -> f64 {
        column_width(self.canvas.frame_size().width, self.history.grid_cols())
    }

    pub fn flags(&self) -> &EditorFlags {
        &self.flags
    }

    pub fn set_locked(&mut self, id: &NodeId, locked: bool) {
        self.flags.set_locked(id, locked);
    }

    pub fn set_hidden(&mut self, id: &NodeId, viewport: Viewport, hidden: bool) {
        self.flags.set_hidden(id, viewport, hidden);
    }

    pub fn set_z_index(&mut self, id: &NodeId, z_index: Option<i32>) {
        self.flags.set_z_index(id, z_index);
    }

    pub fn can_publish(&self) -> bool {
        self.canvas.can_publish()
    }

    /// Snapshot of the page for persistence.
    pub fn to_page_document(&self) -> PageDocument {
        PageDocument {
            components: self.tree().clone(),
            layout: self.layout(),
            editor: self.flags.clone(),
        }
    }

    /// End the session: abandon any gesture, drop the signal subscription,
    /// and hand back the final document.
    pub fn teardown(mut self) -> PageDocument {
        if self.coordinator.cancel(&mut self.host) {
            log::debug!("Abandoned active gesture on teardown");
        }
        self.signals = None;
        log::info!("Editing session ended after {} undoable edits", self.history.past().len());
        self.to_page_document()
    }
}

/// `current` moved by `delta` pixels, as a CSS pixel length. Unparsable
/// values count as zero.
fn offset_px(current: Option<&str>, delta: f64) -> String {
    let base = current
        .map(|v| v.trim())
        .map(|v| v.strip_suffix("px").unwrap_or(v).trim())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);
    // `+ 0.0` turns a negative zero positive.
    let next = (base + delta).round().max(0.0) + 0.0;
    format!("{next}px")
}
