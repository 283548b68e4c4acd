//! Component kind vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad role of a component kind in the page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindCategory {
    /// Top-level sectioning containers.
    Sectioning,
    /// Containers that arrange content inside a section.
    Layout,
    /// Leaf content (never has children).
    Content,
}

/// Every component kind the builder knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Section,
    MultiColumn,
    Tabs,
    Column,
    StackFlex,
    Grid,
    Repeater,
    Text,
    Image,
    Button,
    Box,
    Divider,
    Spacer,
    Video,
    ProductGrid,
}

impl ComponentKind {
    /// All kinds, in palette order.
    pub const ALL: [ComponentKind; 15] = [
        ComponentKind::Section,
        ComponentKind::MultiColumn,
        ComponentKind::Tabs,
        ComponentKind::Column,
        ComponentKind::StackFlex,
        ComponentKind::Grid,
        ComponentKind::Repeater,
        ComponentKind::Text,
        ComponentKind::Image,
        ComponentKind::Button,
        ComponentKind::Box,
        ComponentKind::Divider,
        ComponentKind::Spacer,
        ComponentKind::Video,
        ComponentKind::ProductGrid,
    ];

    pub fn category(self) -> KindCategory {
        match self {
            ComponentKind::Section | ComponentKind::MultiColumn | ComponentKind::Tabs => {
                KindCategory::Sectioning
            }
            ComponentKind::Column
            | ComponentKind::StackFlex
            | ComponentKind::Grid
            | ComponentKind::Repeater => KindCategory::Layout,
            _ => KindCategory::Content,
        }
    }

    /// Whether nodes of this kind own a `children` list.
    pub fn is_container(self) -> bool {
        self.category() != KindCategory::Content
    }

    /// Whether this kind may sit at the page root in sections-only mode.
    pub fn is_top_level_section(self) -> bool {
        self.category() == KindCategory::Sectioning
    }

    /// Whether this kind may occupy a single column of a multi-column layout.
    pub fn is_column_like(self) -> bool {
        self.category() != KindCategory::Sectioning
    }

    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Section => "Section",
            ComponentKind::MultiColumn => "MultiColumn",
            ComponentKind::Tabs => "Tabs",
            ComponentKind::Column => "Column",
            ComponentKind::StackFlex => "StackFlex",
            ComponentKind::Grid => "Grid",
            ComponentKind::Repeater => "Repeater",
            ComponentKind::Text => "Text",
            ComponentKind::Image => "Image",
            ComponentKind::Button => "Button",
            ComponentKind::Box => "Box",
            ComponentKind::Divider => "Divider",
            ComponentKind::Spacer => "Spacer",
            ComponentKind::Video => "Video",
            ComponentKind::ProductGrid => "ProductGrid",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Container kinds the grouping actions can wrap a selection in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    Section,
    MultiColumn,
}

impl From<GroupKind> for ComponentKind {
    fn from(kind: GroupKind) -> Self {
        match kind {
            GroupKind::Section => ComponentKind::Section,
            GroupKind::MultiColumn => ComponentKind::MultiColumn,
        }
    }
}
