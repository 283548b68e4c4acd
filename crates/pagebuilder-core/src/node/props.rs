//! Per-kind component configuration.
//!
//! The engine never looks inside these payloads except for the shared
//! [`Dimensions`], which the resize intent patches.

use super::kind::ComponentKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value stored by a "full size" resize.
pub const FULL_SIZE: &str = "100%";

/// A locale key such as `en` or `de`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en")
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text keyed by locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<Locale, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, locale: Locale, text: impl Into<String>) -> Self {
        self.0.insert(locale, text.into());
        self
    }

    pub fn set(&mut self, locale: Locale, text: impl Into<String>) {
        self.0.insert(locale, text.into());
    }

    pub fn get(&self, locale: &Locale) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// Look up `locale`, then `fallback`.
    pub fn resolve(&self, locale: &Locale, fallback: &Locale) -> Option<&str> {
        self.get(locale).or_else(|| self.get(fallback))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Device class a responsive value can be overridden for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Viewport {
    fn suffix(self) -> &'static str {
        match self {
            Viewport::Desktop => "Desktop",
            Viewport::Tablet => "Tablet",
            Viewport::Mobile => "Mobile",
        }
    }
}

/// A layout dimension a node can be resized along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Width,
    Height,
    Left,
    Top,
    Margin,
    Padding,
}

impl Dimension {
    fn key(self) -> &'static str {
        match self {
            Dimension::Width => "width",
            Dimension::Height => "height",
            Dimension::Left => "left",
            Dimension::Top => "top",
            Dimension::Margin => "margin",
            Dimension::Padding => "padding",
        }
    }
}

/// Address of a single dimension value: the base value, or a viewport override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimensionField {
    pub dimension: Dimension,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
}

impl DimensionField {
    pub fn base(dimension: Dimension) -> Self {
        Self {
            dimension,
            viewport: None,
        }
    }

    pub fn for_viewport(dimension: Dimension, viewport: Viewport) -> Self {
        Self {
            dimension,
            viewport: Some(viewport),
        }
    }

    /// Flat prop name, e.g. `widthTablet`.
    pub fn key(&self) -> String {
        match self.viewport {
            Some(vp) => format!("{}{}", self.dimension.key(), vp.suffix()),
            None => self.dimension.key().to_string(),
        }
    }
}

/// A CSS length with optional per-viewport overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Responsive {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
}

impl Responsive {
    pub fn get(&self, viewport: Option<Viewport>) -> Option<&str> {
        self.slot(viewport).as_deref()
    }

    /// Effective value for a viewport: its override, else the base value.
    pub fn effective(&self, viewport: Viewport) -> Option<&str> {
        self.get(Some(viewport)).or(self.base.as_deref())
    }

    pub fn set(&mut self, viewport: Option<Viewport>, value: Option<String>) {
        *self.slot_mut(viewport) = value;
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.desktop.is_none() && self.tablet.is_none() && self.mobile.is_none()
    }

    fn slot(&self, viewport: Option<Viewport>) -> &Option<String> {
        match viewport {
            None => &self.base,
            Some(Viewport::Desktop) => &self.desktop,
            Some(Viewport::Tablet) => &self.tablet,
            Some(Viewport::Mobile) => &self.mobile,
        }
    }

    fn slot_mut(&mut self, viewport: Option<Viewport>) -> &mut Option<String> {
        match viewport {
            None => &mut self.base,
            Some(Viewport::Desktop) => &mut self.desktop,
            Some(Viewport::Tablet) => &mut self.tablet,
            Some(Viewport::Mobile) => &mut self.mobile,
        }
    }
}

/// Box-model values shared by every component kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default, skip_serializing_if = "Responsive::is_empty")]
    pub width: Responsive,
    #[serde(default, skip_serializing_if = "Responsive::is_empty")]
    pub height: Responsive,
    #[serde(default, skip_serializing_if = "Responsive::is_empty")]
    pub left: Responsive,
    #[serde(default, skip_serializing_if = "Responsive::is_empty")]
    pub top: Responsive,
    #[serde(default, skip_serializing_if = "Responsive::is_empty")]
    pub margin: Responsive,
    #[serde(default, skip_serializing_if = "Responsive::is_empty")]
    pub padding: Responsive,
}

impl Dimensions {
    pub fn get(&self, field: DimensionField) -> Option<&str> {
        self.dimension(field.dimension).get(field.viewport)
    }

    pub fn set(&mut self, field: DimensionField, value: Option<String>) {
        self.dimension_mut(field.dimension).set(field.viewport, value);
    }

    pub fn dimension(&self, dimension: Dimension) -> &Responsive {
        match dimension {
            Dimension::Width => &self.width,
            Dimension::Height => &self.height,
            Dimension::Left => &self.left,
            Dimension::Top => &self.top,
            Dimension::Margin => &self.margin,
            Dimension::Padding => &self.padding,
        }
    }

    fn dimension_mut(&mut self, dimension: Dimension) -> &mut Responsive {
        match dimension {
            Dimension::Width => &mut self.width,
            Dimension::Height => &mut self.height,
            Dimension::Left => &mut self.left,
            Dimension::Top => &mut self.top,
            Dimension::Margin => &mut self.margin,
            Dimension::Padding => &mut self.padding,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width.is_empty()
            && self.height.is_empty()
            && self.left.is_empty()
            && self.top.is_empty()
            && self.margin.is_empty()
            && self.padding.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiColumnProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabsProps {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LocalizedText>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    Row,
    #[default]
    Column,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFlexProps {
    #[serde(default)]
    pub direction: FlexDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeaterProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    #[serde(default)]
    pub text: LocalizedText,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "LocalizedText::is_empty")]
    pub alt: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_aspect: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonProps {
    #[serde(default)]
    pub label: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividerProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacerProps {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default)]
    pub autoplay: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductGridProps {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skus: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u8>,
}

/// Kind-specific configuration, tagged by `type` in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Props {
    Section(SectionProps),
    MultiColumn(MultiColumnProps),
    Tabs(TabsProps),
    Column(ColumnProps),
    StackFlex(StackFlexProps),
    Grid(GridProps),
    Repeater(RepeaterProps),
    Text(TextProps),
    Image(ImageProps),
    Button(ButtonProps),
    Box(BoxProps),
    Divider(DividerProps),
    Spacer(SpacerProps),
    Video(VideoProps),
    ProductGrid(ProductGridProps),
}

impl Props {
    /// Default configuration for a freshly created component.
    pub fn default_for(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Section => Props::Section(SectionProps::default()),
            ComponentKind::MultiColumn => Props::MultiColumn(MultiColumnProps {
                columns: Some(2),
                gap: None,
            }),
            ComponentKind::Tabs => Props::Tabs(TabsProps::default()),
            ComponentKind::Column => Props::Column(ColumnProps::default()),
            ComponentKind::StackFlex => Props::StackFlex(StackFlexProps::default()),
            ComponentKind::Grid => Props::Grid(GridProps {
                columns: Some(3),
                gap: None,
            }),
            ComponentKind::Repeater => Props::Repeater(RepeaterProps::default()),
            ComponentKind::Text => Props::Text(TextProps::default()),
            ComponentKind::Image => Props::Image(ImageProps::default()),
            ComponentKind::Button => Props::Button(ButtonProps::default()),
            ComponentKind::Box => Props::Box(BoxProps::default()),
            ComponentKind::Divider => Props::Divider(DividerProps::default()),
            ComponentKind::Spacer => Props::Spacer(SpacerProps::default()),
            ComponentKind::Video => Props::Video(VideoProps::default()),
            ComponentKind::ProductGrid => Props::ProductGrid(ProductGridProps::default()),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            Props::Section(_) => ComponentKind::Section,
            Props::MultiColumn(_) => ComponentKind::MultiColumn,
            Props::Tabs(_) => ComponentKind::Tabs,
            Props::Column(_) => ComponentKind::Column,
            Props::StackFlex(_) => ComponentKind::StackFlex,
            Props::Grid(_) => ComponentKind::Grid,
            Props::Repeater(_) => ComponentKind::Repeater,
            Props::Text(_) => ComponentKind::Text,
            Props::Image(_) => ComponentKind::Image,
            Props::Button(_) => ComponentKind::Button,
            Props::Box(_) => ComponentKind::Box,
            Props::Divider(_) => ComponentKind::Divider,
            Props::Spacer(_) => ComponentKind::Spacer,
            Props::Video(_) => ComponentKind::Video,
            Props::ProductGrid(_) => ComponentKind::ProductGrid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_field_keys() {
        assert_eq!(DimensionField::base(Dimension::Width).key(), "width");
        assert_eq!(
            DimensionField::for_viewport(Dimension::Height, Viewport::Tablet).key(),
            "heightTablet"
        );
    }

    #[test]
    fn test_responsive_effective_falls_back_to_base() {
        let mut width = Responsive::default();
        width.set(None, Some("50%".to_string()));
        width.set(Some(Viewport::Mobile), Some(FULL_SIZE.to_string()));

        assert_eq!(width.effective(Viewport::Mobile), Some("100%"));
        assert_eq!(width.effective(Viewport::Desktop), Some("50%"));
    }

    #[test]
    fn test_localized_text_fallback() {
        let en = Locale::new("en");
        let de = Locale::new("de");
        let text = LocalizedText::new().with(en.clone(), "Hello");

        assert_eq!(text.resolve(&de, &en), Some("Hello"));
        assert_eq!(text.get(&de), None);
    }

    #[test]
    fn test_props_kind_matches_default() {
        for kind in ComponentKind::ALL {
            assert_eq!(Props::default_for(kind).kind(), kind);
        }
    }

    #[test]
    fn test_props_tagged_by_type() {
        let props = Props::Text(TextProps {
            text: LocalizedText::new().with(Locale::new("en"), "Hi"),
        });
        let json = serde_json::to_value(&props).unwrap();
        assert_eq!(json["type"], "Text");
        assert_eq!(json["text"]["en"], "Hi");

        let back: Props = serde_json::from_value(json).unwrap();
        assert_eq!(back, props);
    }
}
