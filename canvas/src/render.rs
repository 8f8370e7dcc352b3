//! Rendering: builds the live scene tree and paints it to pixels.
//!
//! [`build_scene`] produces the tree a host would mount for the canvas: one
//! root node sized to the viewport and one positioned child per component,
//! carrying both utility classes and resolved inline style. It receives
//! read-only views of the document, theme, selection and viewport and does
//! not mutate application state.
//!
//! [`RasterSnapshot`] is the built-in [`SnapshotProvider`]: it paints fills,
//! borders, outlines, shadows and image placeholders into an RGBA buffer and
//! encodes PNG. Text is not rasterized.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use image::{ImageEncoder, Rgba, RgbaImage};

use crate::camera::{PixelRect, Viewport};
use crate::consts::MAX_RASTER_SIDE_PX;
use crate::doc::{Component, ComponentId, ComponentKind, DocStore};
use crate::hit::Selection;
use crate::theme::ResolvedTheme;

/// Classes added to the selected component's node.
pub const SELECTED_CLASSES: [&str; 4] = ["outline-4", "outline-blue-500", "shadow-lg", "z-20"];
/// Outline color of the selected component.
pub const SELECTION_OUTLINE: &str = "#3b82f6";
/// Outline width of the selected component, in pixels.
pub const SELECTION_OUTLINE_PX: f64 = 4.0;
/// Drop shadow of the selected component.
pub const SELECTION_SHADOW: &str = "0 10px 15px rgba(0,0,0,0.1)";

const IMAGE_PLACEHOLDER_FILL: Rgba<u8> = Rgba([209, 213, 219, 255]);
const SHADOW_FILL: Rgba<u8> = Rgba([0, 0, 0, 40]);
const SHADOW_OFFSET_PX: f64 = 2.0;
const IMAGE_PADDING_PX: f64 = 8.0;

// =============================================================
// Scene tree
// =============================================================

/// Inline style of a scene node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStyle {
    pub background: Option<String>,
    pub color: Option<String>,
    pub border: Option<String>,
    pub border_width: f64,
    pub border_radius: f64,
    pub outline: Option<String>,
    pub outline_width: f64,
    pub shadow: Option<String>,
}

/// One element of the rendered canvas subtree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneNode {
    pub tag: String,
    pub classes: Vec<String>,
    pub style: NodeStyle,
    /// Position relative to the canvas root, in container pixels.
    pub rect: PixelRect,
    pub img_src: Option<String>,
    pub text: Option<String>,
    pub component_id: Option<ComponentId>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    fn new(tag: &str, rect: PixelRect) -> Self {
        Self { tag: tag.to_owned(), rect, ..Self::default() }
    }

    fn with_classes(mut self, classes: &[&str]) -> Self {
        self.classes.extend(classes.iter().map(|c| (*c).to_owned()));
        self
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Apply `f` to every node below this one, depth first.
    pub fn for_each_descendant_mut(&mut self, f: &mut dyn FnMut(&mut SceneNode)) {
        for child in &mut self.children {
            f(child);
            child.for_each_descendant_mut(f);
        }
    }

    /// This node and every descendant, depth first.
    #[must_use]
    pub fn iter(&self) -> Vec<&SceneNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.iter());
        }
        out
    }

    /// The node rendering component `id`, if present.
    #[must_use]
    pub fn find_component(&self, id: &ComponentId) -> Option<&SceneNode> {
        self.iter().into_iter().find(|n| n.component_id.as_ref() == Some(id))
    }
}

/// Build the scene tree for the canvas.
#[must_use]
pub fn build_scene(doc: &DocStore, theme: &ResolvedTheme, selection: &Selection, viewport: &Viewport) -> SceneNode {
    let mut root = SceneNode::new("div", PixelRect::new(0.0, 0.0, viewport.width_px(), viewport.height_px()))
        .with_classes(&["relative", "w-full", "aspect-square", "border", "rounded-2xl", "shadow-xl", "overflow-hidden"]);
    root.style = NodeStyle {
        background: Some(theme.canvas_background.clone()),
        color: Some(theme.text.clone()),
        border: Some(theme.border.clone()),
        border_width: 1.0,
        shadow: Some(theme.shadow.clone()),
        ..NodeStyle::default()
    };

    root.children = doc
        .all()
        .into_iter()
        .map(|c| {
            let mut node = component_node(c, theme, viewport);
            if selection.is_selected(&c.id) {
                node.classes.extend(SELECTED_CLASSES.iter().map(|s| (*s).to_owned()));
                node.style.outline = Some(SELECTION_OUTLINE.to_owned());
                node.style.outline_width = SELECTION_OUTLINE_PX;
                node.style.shadow = Some(SELECTION_SHADOW.to_owned());
            }
            node
        })
        .collect();
    root
}

fn component_node(component: &Component, theme: &ResolvedTheme, viewport: &Viewport) -> SceneNode {
    let rect = viewport.canonical_to_pixel(component.bbox);
    let style = theme.style_for(component);
    let text = Some(component.display_text().to_owned());

    let mut node = match component.kind {
        ComponentKind::Button => SceneNode::new("button", rect).with_classes(&["rounded-lg", "p-2", "shadow-md"]),
        ComponentKind::Heading => SceneNode::new("h2", rect).with_classes(&["font-bold"]),
        ComponentKind::Text => SceneNode::new("p", rect).with_classes(&["text-base"]),
        ComponentKind::Input => {
            let mut n = SceneNode::new("input", rect).with_classes(&["border", "rounded-lg", "p-2"]);
            n.style.border = Some(theme.border.clone());
            n.style.border_width = 1.0;
            n
        }
        ComponentKind::Checkbox => SceneNode::new("div", rect).with_classes(&["flex", "items-center", "gap-2"]),
        ComponentKind::Nav => {
            let mut n = SceneNode::new("nav", rect).with_classes(&["rounded-md", "p-3", "flex", "justify-around"]);
            n.children = component
                .menu()
                .into_iter()
                .map(|item| {
                    let mut a = SceneNode::new("a", rect).with_classes(&["hover:underline"]);
                    a.text = Some(item.to_owned());
                    a
                })
                .collect();
            n
        }
        ComponentKind::Footer => SceneNode::new("footer", rect).with_classes(&["p-3", "rounded-md", "text-center"]),
        ComponentKind::Image | ComponentKind::Frame => {
            let mut n = SceneNode::new("div", rect).with_classes(&["border-2", "border-dashed", "rounded-lg", "p-2"]);
            n.style.border = Some(theme.border.clone());
            n.style.border_width = 2.0;
            let inner = PixelRect::new(
                rect.x + IMAGE_PADDING_PX,
                rect.y + IMAGE_PADDING_PX,
                (rect.width - 2.0 * IMAGE_PADDING_PX).max(0.0),
                (rect.height - 2.0 * IMAGE_PADDING_PX).max(0.0),
            );
            let mut img = SceneNode::new("img", inner).with_classes(&["w-full", "h-full", "object-cover"]);
            img.img_src = Some(component.image_source().to_owned());
            n.children.push(img);
            n
        }
        ComponentKind::Icon => {
            let mut n = SceneNode::new("img", rect).with_classes(&["object-contain"]);
            n.img_src = Some(component.image_source().to_owned());
            n
        }
        ComponentKind::Unknown => {
            let mut n = SceneNode::new("div", rect).with_classes(&["border", "border-dashed"]);
            n.style.border = Some(theme.border.clone());
            n.style.border_width = 1.0;
            n.text = component.label.clone();
            n
        }
    };

    node.classes.insert(0, "absolute".to_owned());
    node.component_id = Some(component.id.clone());
    node.style.background.clone_from(&style.background);
    node.style.color = Some(style.color);
    node.style.border_radius = style.border_radius;
    if component.kind.carries_text() && node.text.is_none() {
        node.text = text;
    }
    node
}

// =============================================================
// Snapshot provider
// =============================================================

/// Error returned by a snapshot provider.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot size {width}x{height} is out of range")]
    InvalidSize { width: u32, height: u32 },
    #[error("png encode: {0}")]
    Encode(#[from] image::ImageError),
    #[error("snapshot provider: {0}")]
    Provider(String),
}

/// What to capture and how.
#[derive(Debug, Clone, Copy)]
pub struct CaptureRequest<'a> {
    pub node: &'a SceneNode,
    /// Raster pixels per container pixel.
    pub scale: f64,
    /// Page color behind the node.
    pub background: &'a str,
}

/// Rasterizes a scene subtree to encoded image bytes.
#[async_trait::async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Capture `request.node` as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the subtree cannot be rasterized.
    async fn capture(&self, request: CaptureRequest<'_>) -> Result<Vec<u8>, SnapshotError>;
}

/// Software rasterizer over `image::RgbaImage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterSnapshot;

#[async_trait::async_trait]
impl SnapshotProvider for RasterSnapshot {
    async fn capture(&self, request: CaptureRequest<'_>) -> Result<Vec<u8>, SnapshotError> {
        let img = rasterize(request)?;
        let mut png = Vec::new();
        image::codecs::png::PngEncoder::new(&mut png).write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(png)
    }
}

/// Paint `request.node` into an RGBA buffer.
///
/// # Errors
///
/// Returns [`SnapshotError::InvalidSize`] when the scaled node is empty or
/// larger than the raster limit.
pub fn rasterize(request: CaptureRequest<'_>) -> Result<RgbaImage, SnapshotError> {
    let root = request.node;
    let width = raster_len(root.rect.width * request.scale);
    let height = raster_len(root.rect.height * request.scale);
    if width == 0 || height == 0 || width > MAX_RASTER_SIDE_PX || height > MAX_RASTER_SIDE_PX {
        return Err(SnapshotError::InvalidSize { width, height });
    }

    let background = parse_color(request.background).unwrap_or(Rgba([255, 255, 255, 255]));
    let mut canvas = Painter {
        img: RgbaImage::from_pixel(width, height, background),
        scale: request.scale,
        origin_x: root.rect.x,
        origin_y: root.rect.y,
    };
    canvas.paint(root);
    Ok(canvas.img)
}

struct Painter {
    img: RgbaImage,
    scale: f64,
    origin_x: f64,
    origin_y: f64,
}

impl Painter {
    fn paint(&mut self, node: &SceneNode) {
        let rect = node.rect;
        if node.style.shadow.is_some() {
            let offset = PixelRect::new(rect.x + SHADOW_OFFSET_PX, rect.y + SHADOW_OFFSET_PX, rect.width, rect.height);
            self.fill(offset, SHADOW_FILL);
        }
        if let Some(bg) = node.style.background.as_deref().and_then(parse_color) {
            self.fill(rect, bg);
        }
        if node.img_src.is_some() {
            self.fill(rect, IMAGE_PLACEHOLDER_FILL);
        }
        if let Some(border) = node.style.border.as_deref().and_then(parse_color) {
            self.stroke(rect, node.style.border_width, border);
        }
        if let Some(outline) = node.style.outline.as_deref().and_then(parse_color) {
            let w = node.style.outline_width;
            let outer = PixelRect::new(rect.x - w, rect.y - w, rect.width + 2.0 * w, rect.height + 2.0 * w);
            self.stroke(outer, w, outline);
        }
        for child in &node.children {
            self.paint(child);
        }
    }

    /// Fill `rect` (container pixels), alpha-blending translucent colors.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn fill(&mut self, rect: PixelRect, color: Rgba<u8>) {
        let clamp_x = |v: f64| v.clamp(0.0, f64::from(self.img.width())) as u32;
        let clamp_y = |v: f64| v.clamp(0.0, f64::from(self.img.height())) as u32;
        let x0 = clamp_x(((rect.x - self.origin_x) * self.scale).floor());
        let y0 = clamp_y(((rect.y - self.origin_y) * self.scale).floor());
        let x1 = clamp_x(((rect.x + rect.width - self.origin_x) * self.scale).ceil());
        let y1 = clamp_y(((rect.y + rect.height - self.origin_y) * self.scale).ceil());

        for y in y0..y1 {
            for x in x0..x1 {
                let px = self.img.get_pixel_mut(x, y);
                *px = blend(*px, color);
            }
        }
    }

    /// Stroke the inside edge of `rect` with a band `width` pixels thick.
    fn stroke(&mut self, rect: PixelRect, width: f64, color: Rgba<u8>) {
        if width <= 0.0 {
            return;
        }
        let w = width.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        let right = rect.x + rect.width - w;
        let bottom = rect.y + rect.height - w;
        self.fill(PixelRect::new(rect.x, rect.y, rect.width, w), color);
        self.fill(PixelRect::new(rect.x, bottom, rect.width, w), color);
        self.fill(PixelRect::new(rect.x, rect.y, w, rect.height), color);
        self.fill(PixelRect::new(right, rect.y, w, rect.height), color);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn raster_len(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 { v.ceil().min(f64::from(u32::MAX)) as u32 } else { 0 }
}

fn blend(under: Rgba<u8>, over: Rgba<u8>) -> Rgba<u8> {
    let a = u16::from(over[3]);
    if a == 255 {
        return over;
    }
    let mix = |u: u8, o: u8| -> u8 {
        let v = (u16::from(o) * a + u16::from(u) * (255 - a)) / 255;
        u8::try_from(v).unwrap_or(u8::MAX)
    };
    Rgba([mix(under[0], over[0]), mix(under[1], over[1]), mix(under[2], over[2]), under[3].max(over[3])])
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
#[must_use]
pub fn parse_color(raw: &str) -> Option<Rgba<u8>> {
    let hex = raw.trim().strip_prefix('#')?;
    let nibble = |i: usize| hex_value(hex.get(i..=i)?).map(|v| v * 17);
    let byte = |i: usize| hex_value(hex.get(i..i + 2)?);
    match hex.len() {
        3 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

fn hex_value(digits: &str) -> Option<u8> {
    match u8::from_str_radix(digits, 16) {
        Ok(v) => Some(v),
        Err(_) => None,
    }
}
