//! Plain-data page record exchanged with the persistence layer.

use crate::layout::{ConfigError, EditorFlags, LayoutConfig};
use crate::tree::Tree;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid layout: {0}")]
    Layout(#[from] ConfigError),
}

/// A page as stored: its components, layout, and editor flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    #[serde(default)]
    pub components: Tree,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default, skip_serializing_if = "EditorFlags::is_empty")]
    pub editor: EditorFlags,
}

impl PageDocument {
    pub fn new(components: Tree, layout: LayoutConfig) -> Self {
        Self {
            components,
            layout,
            editor: EditorFlags::default(),
        }
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a document from JSON. Containers missing a `children`
    /// list get an empty one.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let mut doc: PageDocument = serde_json::from_str(json)?;
        doc.layout.validate()?;
        doc.components = doc.components.normalized();
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ComponentKind, Node};

    #[test]
    fn test_round_trip_json() {
        let mut doc = PageDocument::new(
            Tree::new(vec![Node::container(
                "a",
                ComponentKind::Section,
                vec![Node::of_kind("b", ComponentKind::Text)],
            )]),
            LayoutConfig::default(),
        );
        doc.editor.set_locked(&"b".into(), true);

        let json = doc.to_json().unwrap();
        let back = PageDocument::from_json(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_load_normalizes_containers() {
        let json = r#"{
            "components": [ { "id": "s", "type": "Section" } ],
            "layout": { "gridCols": 8 }
        }"#;
        let doc = PageDocument::from_json(json).unwrap();
        assert_eq!(doc.layout.grid_cols.get(), 8);
        assert_eq!(doc.components.nodes()[0].children, Some(Vec::new()));
    }

    #[test]
    fn test_load_rejects_bad_layout() {
        let json = r#"{
            "components": [],
            "layout": { "breakpoints": [ { "id": "x", "label": "X", "min": 900, "max": 100 } ] }
        }"#;
        assert!(matches!(
            PageDocument::from_json(json),
            Err(DocumentError::Layout(ConfigError::InvertedBreakpoint { .. }))
        ));
    }
}
