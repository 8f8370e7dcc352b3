//! Shared numeric and string constants for the canvas crate.

// ── Geometry ────────────────────────────────────────────────────

/// Side of the canonical square every component box is expressed in.
pub const CANVAS_SIZE: f64 = 640.0;

/// Width given to a component dropped from the palette, in canonical units.
pub const DROP_WIDTH: f64 = 120.0;

/// Height given to a component dropped from the palette, in canonical units.
pub const DROP_HEIGHT: f64 = 60.0;

/// Smallest container side accepted by the viewport transform, in pixels.
pub const MIN_VIEWPORT_PX: f64 = 1.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Pointer travel, in pixels per axis, below which a press and release is a click.
pub const CLICK_SLOP_PX: f64 = 1.0;

// ── Defaults ────────────────────────────────────────────────────

/// Image shown by frames and images without an explicit `img_url`.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://archive.org/download/placeholder-image/placeholder-image.jpg";

/// Image shown by icons without an explicit `img_url`.
pub const PLACEHOLDER_ICON_URL: &str = "https://www.iconpacks.net/icons/1/free-star-icon-984-thumb.png";

/// Menu shown by a nav without explicit `menu_items`.
pub const DEFAULT_MENU_ITEMS: [&str; 3] = ["Home", "About", "Contact"];

/// Background override given to freshly dropped buttons (green-500).
pub const DROP_BUTTON_BG: &str = "#22c55e";

// ── Export ──────────────────────────────────────────────────────

/// Raster scale factor applied when snapshotting the canvas.
pub const EXPORT_SCALE: f64 = 2.0;

/// Widest container preset, in pixels.
pub const LARGE_CANVAS_PX: f64 = 1000.0;

/// Largest raster side accepted by the snapshotter: the widest preset at
/// [`EXPORT_SCALE`].
pub const MAX_RASTER_SIDE_PX: u32 = 2000;

/// A4 portrait page width in PDF points.
pub const A4_WIDTH_PT: f64 = 595.28;

/// A4 portrait page height in PDF points.
pub const A4_HEIGHT_PT: f64 = 841.89;

/// Embedded star glyph substituted for externally hosted icons before rasterizing.
pub const ICON_DATA_URI: &str = "data:image/svg+xml;utf8,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 576 512'><path d='M287.9 0l68.6 141.3 153.2 22.6-111 108.3 26.2 155.6-137-73.2-137 73.2 26.2-155.6-111-108.3 153.2-22.6z' fill='gray'/></svg>";

/// URL fragments identifying externally hosted icon images.
pub const ICON_HOST_MARKERS: [&str; 2] = ["iconpacks.net", "free-star-icon-984-thumb.png"];
