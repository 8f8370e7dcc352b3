//! Viewport transform between canonical space and rendered pixels.
//!
//! The canonical space is a fixed `CANVAS_SIZE` square. The render container
//! can be any size and can change at any time (window resize, layout reflow),
//! so the transform carries nothing but the latest observed container size.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_SIZE, LARGE_CANVAS_PX, MIN_VIEWPORT_PX};
use crate::doc::CanvasBox;

/// A point in either canonical or pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in container pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Whether `pt` is inside the rectangle, edges inclusive.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }
}

/// Current rendered size of the canvas container, in CSS pixels.
///
/// Sides are clamped to at least one pixel so the inverse mapping is always defined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    width_px: f64,
    height_px: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width_px: CANVAS_SIZE, height_px: CANVAS_SIZE }
    }
}

impl Viewport {
    #[must_use]
    pub fn new(width_px: f64, height_px: f64) -> Self {
        Self { width_px: clamp_side(width_px), height_px: clamp_side(height_px) }
    }

    #[must_use]
    pub fn width_px(&self) -> f64 {
        self.width_px
    }

    #[must_use]
    pub fn height_px(&self) -> f64 {
        self.height_px
    }

    /// Horizontal pixels per canonical unit.
    #[must_use]
    pub fn scale_x(&self) -> f64 {
        self.width_px / CANVAS_SIZE
    }

    /// Vertical pixels per canonical unit.
    #[must_use]
    pub fn scale_y(&self) -> f64 {
        self.height_px / CANVAS_SIZE
    }

    /// Convert a canonical point to container pixels.
    #[must_use]
    pub fn canonical_to_pixel_point(&self, pt: Point) -> Point {
        Point {
            x: (pt.x / CANVAS_SIZE) * self.width_px,
            y: (pt.y / CANVAS_SIZE) * self.height_px,
        }
    }

    /// Convert a container pixel point to canonical units.
    #[must_use]
    pub fn pixel_to_canonical_point(&self, pt: Point) -> Point {
        Point {
            x: (pt.x / self.width_px) * CANVAS_SIZE,
            y: (pt.y / self.height_px) * CANVAS_SIZE,
        }
    }

    /// Convert a canonical box to a pixel rectangle.
    #[must_use]
    pub fn canonical_to_pixel(&self, b: CanvasBox) -> PixelRect {
        PixelRect {
            x: (b.x / CANVAS_SIZE) * self.width_px,
            y: (b.y / CANVAS_SIZE) * self.height_px,
            width: (b.width / CANVAS_SIZE) * self.width_px,
            height: (b.height / CANVAS_SIZE) * self.height_px,
        }
    }

    /// Convert a pixel rectangle to a canonical box.
    #[must_use]
    pub fn pixel_to_canonical(&self, r: PixelRect) -> CanvasBox {
        CanvasBox {
            x: (r.x / self.width_px) * CANVAS_SIZE,
            y: (r.y / self.height_px) * CANVAS_SIZE,
            width: (r.width / self.width_px) * CANVAS_SIZE,
            height: (r.height / self.height_px) * CANVAS_SIZE,
        }
    }
}

fn clamp_side(px: f64) -> f64 {
    if px.is_finite() { px.max(MIN_VIEWPORT_PX) } else { MIN_VIEWPORT_PX }
}

/// Preset container widths offered by the preview surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasSizePreset {
    Small,
    #[default]
    Medium,
    Large,
}

impl CanvasSizePreset {
    /// Maximum container side in pixels for this preset.
    #[must_use]
    pub fn max_width_px(self) -> f64 {
        match self {
            Self::Small => 600.0,
            Self::Medium => 800.0,
            Self::Large => LARGE_CANVAS_PX,
        }
    }

    /// Square viewport for this preset.
    #[must_use]
    pub fn viewport(self) -> Viewport {
        let side = self.max_width_px();
        Viewport::new(side, side)
    }
}
