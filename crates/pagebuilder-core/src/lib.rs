//! Page Builder Core Library
//!
//! Platform-agnostic document engine for the page builder: the component tree,
//! placement rules, mutations, undo history, and the gesture layer that turns
//! pointer input into edits.

pub mod announce;
pub mod canvas;
pub mod document;
pub mod gesture;
pub mod history;
pub mod input;
pub mod layout;
pub mod mutation;
pub mod node;
pub mod placement;
pub mod selection;
pub mod session;
pub mod shortcuts;
pub mod signals;
pub mod snap;
pub mod tree;

pub use announce::Announcement;
pub use canvas::{CanvasState, Orientation, Progress};
pub use document::{DocumentError, PageDocument};
pub use gesture::{Coordinator, DragSource, DropTarget, GestureOutcome, HeadlessHost, SurfaceHost};
pub use history::History;
pub use input::{KeyEvent, Modifiers, PointerId};
pub use layout::{Breakpoint, ConfigError, EditorFlags, GridCols, LayoutConfig};
pub use mutation::{Intent, MutationContext, MutationError, ReorderDirection, ResizeValue, reduce, try_reduce};
pub use node::{ComponentKind, GroupKind, Node, NodeId, NodeRef, Props, Viewport};
pub use placement::{ParentKind, PlacementPolicy, ValidationResult, can_drop_child, validate_document, validate_placement};
pub use selection::SelectionState;
pub use session::EditorSession;
pub use shortcuts::{Command, NudgeStep, ShortcutRegistry, ZOrderChange};
pub use signals::{SignalError, SignalSender, StructureSignal};
pub use tree::{Location, Tree};
