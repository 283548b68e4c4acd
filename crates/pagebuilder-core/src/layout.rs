//! Page-wide presentation settings kept outside undo/redo.

use crate::node::{NodeId, NodeRef, Viewport};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Default number of grid columns for a new page.
pub const DEFAULT_GRID_COLS: u8 = 12;
/// Largest grid a page may use.
pub const MAX_GRID_COLS: u8 = 24;

/// Layout configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Grid columns must be between 1 and {MAX_GRID_COLS}, got {0}")]
    GridCols(u8),
    #[error("Breakpoint '{id}' has min {min} greater than max {max}")]
    InvertedBreakpoint { id: String, min: u32, max: u32 },
    #[error("Duplicate breakpoint id: {0}")]
    DuplicateBreakpoint(String),
}

/// Number of grid columns, always within `1..=24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct GridCols(u8);

impl GridCols {
    pub fn new(cols: u8) -> Result<Self, ConfigError> {
        if (1..=MAX_GRID_COLS).contains(&cols) {
            Ok(Self(cols))
        } else {
            Err(ConfigError::GridCols(cols))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for GridCols {
    fn default() -> Self {
        Self(DEFAULT_GRID_COLS)
    }
}

impl TryFrom<u8> for GridCols {
    type Error = ConfigError;

    fn try_from(cols: u8) -> Result<Self, Self::Error> {
        Self::new(cols)
    }
}

impl From<GridCols> for u8 {
    fn from(cols: GridCols) -> Self {
        cols.0
    }
}

/// A named responsive breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl Breakpoint {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            min: None,
            max: None,
        }
    }

    pub fn with_bounds(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Whether a viewport `width` falls inside this breakpoint.
    pub fn contains(&self, width: u32) -> bool {
        self.min.is_none_or(|min| width >= min) && self.max.is_none_or(|max| width <= max)
    }
}

/// Grid and breakpoint settings for a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    #[serde(default)]
    pub grid_cols: GridCols,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breakpoints: Vec<Breakpoint>,
}

impl LayoutConfig {
    pub fn new(grid_cols: u8, breakpoints: Vec<Breakpoint>) -> Result<Self, ConfigError> {
        let config = Self {
            grid_cols: GridCols::new(grid_cols)?,
            breakpoints,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check breakpoint bounds and id uniqueness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for bp in &self.breakpoints {
            if !seen.insert(bp.id.as_str()) {
                return Err(ConfigError::DuplicateBreakpoint(bp.id.clone()));
            }
            if let (Some(min), Some(max)) = (bp.min, bp.max)
                && min > max
            {
                return Err(ConfigError::InvertedBreakpoint {
                    id: bp.id.clone(),
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// First breakpoint containing `width`.
    pub fn breakpoint_for(&self, width: u32) -> Option<&Breakpoint> {
        self.breakpoints.iter().find(|bp| bp.contains(width))
    }
}

/// Presentation flags for one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFlags {
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hidden: Vec<Viewport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

impl NodeFlags {
    fn is_default(&self) -> bool {
        self == &NodeFlags::default()
    }
}

/// Per-node editor flags. Not part of the undo/redo stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditorFlags(HashMap<NodeId, NodeFlags>);

impl EditorFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &NodeId) -> Option<&NodeFlags> {
        self.0.get(id)
    }

    pub fn is_locked(&self, id: &NodeId) -> bool {
        self.0.get(id).is_some_and(|f| f.locked)
    }

    pub fn is_hidden(&self, id: &NodeId, viewport: Viewport) -> bool {
        self.0.get(id).is_some_and(|f| f.hidden.contains(&viewport))
    }

    pub fn z_index(&self, id: &NodeId) -> Option<i32> {
        self.0.get(id).and_then(|f| f.z_index)
    }

    pub fn set_locked(&mut self, id: &NodeId, locked: bool) {
        self.update(id, |f| f.locked = locked);
    }

    pub fn set_hidden(&mut self, id: &NodeId, viewport: Viewport, hidden: bool) {
        self.update(id, |f| {
            f.hidden.retain(|v| *v != viewport);
            if hidden {
                f.hidden.push(viewport);
            }
        });
    }

    pub fn set_z_index(&mut self, id: &NodeId, z_index: Option<i32>) {
        self.update(id, |f| f.z_index = z_index);
    }

    fn update(&mut self, id: &NodeId, apply: impl FnOnce(&mut NodeFlags)) {
        let flags = self.0.entry(id.clone()).or_default();
        apply(flags);
        if flags.is_default() {
            self.0.remove(id);
        }
    }

    /// Map a drop slot among the siblings visible on `viewport` to an index
    /// in the full child list. Slots past the last visible sibling map to the
    /// end of the list.
    pub fn underlying_index(&self, siblings: &[NodeRef], visible_index: usize, viewport: Viewport) -> usize {
        siblings
            .iter()
            .enumerate()
            .filter(|(_, n)| !self.is_hidden(&n.id, viewport))
            .nth(visible_index)
            .map(|(i, _)| i)
            .unwrap_or(siblings.len())
    }
}
