//! Accessibility announcements reported to the host, which owns their wording.

use crate::mutation::Intent;
use crate::node::ComponentKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Announcement {
    BlockAdded,
    BlockMoved,
    BlockResized,
    BlockDuplicated,
    BlockDeleted,
    BlockReordered,
    Grouped,
    Ungrouped,
    /// `tab` is zero-based.
    MovedToTab { tab: usize },
    BroughtForward,
    SentBackward,
    BroughtToFront,
    SentToBack,
    CannotPlace { kind: ComponentKind },
    Canceled,
}

impl Announcement {
    /// Message key hosts typically look the text up by.
    pub fn key(&self) -> &'static str {
        match self {
            Announcement::BlockAdded => "blockAdded",
            Announcement::BlockMoved => "blockMoved",
            Announcement::BlockResized => "blockResized",
            Announcement::BlockDuplicated => "blockDuplicated",
            Announcement::BlockDeleted => "blockDeleted",
            Announcement::BlockReordered => "blockReordered",
            Announcement::Grouped => "grouped",
            Announcement::Ungrouped => "ungrouped",
            Announcement::MovedToTab { .. } => "movedToTab",
            Announcement::BroughtForward => "broughtForward",
            Announcement::SentBackward => "sentBackward",
            Announcement::BroughtToFront => "broughtToFront",
            Announcement::SentToBack => "sentToBack",
            Announcement::CannotPlace { .. } => "cannotPlace",
            Announcement::Canceled => "canceled",
        }
    }
}

impl From<&Intent> for Announcement {
    fn from(intent: &Intent) -> Self {
        match intent {
            Intent::Move { .. } => Announcement::BlockMoved,
            Intent::Insert { .. } => Announcement::BlockAdded,
            Intent::Remove { .. } => Announcement::BlockDeleted,
            Intent::Group { .. } => Announcement::Grouped,
            Intent::Ungroup { .. } => Announcement::Ungrouped,
            Intent::Resize { .. } => Announcement::BlockResized,
            Intent::Duplicate { .. } => Announcement::BlockDuplicated,
            Intent::Reorder { .. } => Announcement::BlockReordered,
            Intent::AssignTab { tab: Some(tab), .. } => Announcement::MovedToTab { tab: *tab },
            Intent::AssignTab { tab: None, .. } => Announcement::BlockMoved,
        }
    }
}
