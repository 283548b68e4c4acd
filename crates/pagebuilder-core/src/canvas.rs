//! Canvas and toolbar state: device preview, locale, zoom, and the
//! validity/progress indicators shown next to the publish action.

use crate::node::{Locale, Viewport};
use crate::placement::{PlacementPolicy, ValidationResult, validate_document};
use crate::tree::Tree;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 4.0;

/// Natural (unrotated) preview size for a device class.
pub fn device_size(viewport: Viewport) -> Size {
    match viewport {
        Viewport::Desktop => Size::new(1280.0, 800.0),
        Viewport::Tablet => Size::new(768.0, 1024.0),
        Viewport::Mobile => Size::new(375.0, 667.0),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// The preset's own orientation.
    #[default]
    Natural,
    /// Width and height swapped.
    Rotated,
}

/// Required-field completion, supplied by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub done: u32,
    pub total: u32,
}

impl Progress {
    pub fn new(done: u32, total: u32) -> Self {
        Self {
            done: done.min(total),
            total,
        }
    }

    /// Completion in `0.0..=1.0`; an empty checklist counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            f64::from(self.done) / f64::from(self.total)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.done >= self.total
    }
}

/// What the toolbar shows about the page being edited.
#[derive(Debug, Clone)]
pub struct CanvasState {
    viewport: Viewport,
    orientation: Orientation,
    locale: Locale,
    zoom: f64,
    validity: ValidationResult,
    progress: Progress,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            viewport: Viewport::Desktop,
            orientation: Orientation::Natural,
            locale: Locale::default(),
            zoom: 1.0,
            validity: ValidationResult::Valid,
            progress: Progress::default(),
        }
    }
}

impl CanvasState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Switch device preview; orientation resets to the preset's own.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.orientation = Orientation::Natural;
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn rotate(&mut self) {
        self.orientation = match self.orientation {
            Orientation::Natural => Orientation::Rotated,
            Orientation::Rotated => Orientation::Natural,
        };
    }

    /// Preview frame size for the current device and orientation.
    pub fn frame_size(&self) -> Size {
        let size = device_size(self.viewport);
        match self.orientation {
            Orientation::Natural => size,
            Orientation::Rotated => Size::new(size.height, size.width),
        }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom, clamped to the supported range. Non-finite values are
    /// ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() {
            log::debug!("Ignoring non-finite zoom {}", zoom);
            return;
        }
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Largest zoom at which the frame fits in `available`, capped at 100%.
    pub fn fit_to(&mut self, available: Size) {
        let frame = self.frame_size();
        let scale = (available.width / frame.width).min(available.height / frame.height);
        self.set_zoom(scale.min(1.0));
    }

    /// Convert a screen point to canvas coordinates given where the frame's
    /// top-left corner sits on screen.
    pub fn screen_to_canvas(&self, screen: Point, frame_origin: Point) -> Point {
        let offset: Vec2 = screen - frame_origin;
        (offset / self.zoom).to_point()
    }

    pub fn validity(&self) -> &ValidationResult {
        &self.validity
    }

    /// Re-derive validity from the current tree.
    pub fn refresh(&mut self, tree: &Tree, policy: PlacementPolicy) {
        self.validity = validate_document(tree, policy);
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn set_progress(&mut self, progress: Progress) {
        self.progress = progress;
    }

    /// Publishing is allowed only for a structurally valid page.
    pub fn can_publish(&self) -> bool {
        self.validity.is_ok()
    }
}
