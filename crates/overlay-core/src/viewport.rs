//! Viewport and zoom math
//!
//! Overlay positions are stored normalized (0..1, top-left origin) and are
//! multiplied by the current viewport on every draw.

use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.1;

/// CSS pixels per typographic point
pub const PT_TO_PX: f64 = 1.3333;

/// Pixel dimensions and scale of the last rasterized page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, scale: f64) -> Self {
        Self {
            width,
            height,
            scale,
        }
    }

    /// Placeholder used before the first render completes
    pub fn empty(scale: f64) -> Self {
        Self::new(0.0, 0.0, scale)
    }

    /// Normalized position to pixel position
    pub fn to_px(&self, nx: f64, ny: f64) -> (f64, f64) {
        (nx * self.width, ny * self.height)
    }

    /// Pixel position (e.g. a click) to normalized position
    pub fn to_normalized(&self, px: f64, py: f64) -> (f64, f64) {
        if self.width <= 0.0 || self.height <= 0.0 {
            return (0.0, 0.0);
        }
        (px / self.width, py / self.height)
    }

    /// Point size to pixel size at the current scale
    pub fn pt_to_px(&self, pt: f64) -> f64 {
        pt * PT_TO_PX * self.scale
    }

    /// Integer size for the canvas backing store
    pub fn backing_size(&self) -> (u32, u32) {
        (self.width.floor() as u32, self.height.floor() as u32)
    }
}

/// Clamp a zoom factor into `[MIN_SCALE, MAX_SCALE]`
pub fn clamp_scale(factor: f64) -> f64 {
    MIN_SCALE.max(MAX_SCALE.min(factor))
}

/// Page size in PDF points at scale 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    pub fn viewport_at(&self, scale: f64) -> Viewport {
        Viewport::new(self.width * scale, self.height * scale, scale)
    }

    /// Scale that makes the page exactly as wide as the container, clamped
    pub fn fit_width_scale(&self, container_width: f64) -> f64 {
        if self.width <= 0.0 {
            return 1.0;
        }
        clamp_scale(container_width / self.width)
    }

    /// Largest scale at which the whole page fits the container, clamped
    pub fn fit_page_scale(&self, container_width: f64, container_height: f64) -> f64 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return 1.0;
        }
        let by_width = container_width / self.width;
        let by_height = container_height / self.height;
        clamp_scale(by_width.min(by_height))
    }
}

/// Zoom bounds used by the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self {
            min: MIN_SCALE,
            max: MAX_SCALE,
            step: ZOOM_STEP,
        }
    }
}

impl ZoomBounds {
    /// Clamp into these bounds, never leaving `[MIN_SCALE, MAX_SCALE]`
    pub fn clamp(&self, factor: f64) -> f64 {
        clamp_scale(self.min.max(self.max.min(factor)))
    }
}

/// Current zoom factor and the stepping rules of the zoom buttons
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomController {
    scale: f64,
    bounds: ZoomBounds,
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::new(ZoomBounds::default())
    }
}

impl ZoomController {
    pub fn new(bounds: ZoomBounds) -> Self {
        Self { scale: 1.0, bounds }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Record a new factor, clamped; returns the recorded value
    pub fn set_scale(&mut self, factor: f64) -> f64 {
        self.scale = self.bounds.clamp(factor);
        self.scale
    }

    pub fn step_in(&mut self) -> Option<f64> {
        self.step_to(self.scale + self.bounds.step)
    }

    pub fn step_out(&mut self) -> Option<f64> {
        self.step_to(self.scale - self.bounds.step)
    }

    /// Move to `next` rounded to two decimals. `None` when clamping leaves
    /// the scale where it was, so the page is not re-rendered needlessly.
    pub fn step_to(&mut self, next: f64) -> Option<f64> {
        let clamped = self.bounds.clamp(next);
        if (clamped - self.scale).abs() < 1e-3 {
            return None;
        }
        self.scale = (clamped * 100.0).round() / 100.0;
        Some(self.scale)
    }

    /// Percentage label, e.g. `"110%"`
    pub fn label(&self) -> String {
        format!("{}%", (self.scale * 100.0).round() as i64)
    }
}
