//! Document model: layout components, their geometry, and the ordered store.
//!
//! This module defines the core data types that describe what is on the canvas
//! (`Component`, `ComponentKind`, `CanvasBox`), the id allocator used when new
//! components are created, and the runtime store that owns all live components
//! (`DocStore`).
//!
//! Geometry is always kept in canonical units (see [`crate::consts::CANVAS_SIZE`]).
//! Pixel coordinates are derived by [`crate::camera::Viewport`] and never stored.
//!
//! Data flows into this layer from the detection normalizer (bulk load) and
//! from the interaction engine (single-record replacement). The code generator
//! and the renderer read from `DocStore` via `all`.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MENU_ITEMS, PLACEHOLDER_ICON_URL, PLACEHOLDER_IMAGE_URL};

/// Unique identifier for a component, stable for the component's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

/// The kind of a component. Selects its rendering, editing and generation behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Image placeholder with a dashed border and caption.
    Frame,
    /// Navigation bar with a row of menu links.
    Nav,
    /// Body paragraph.
    Text,
    /// Section heading.
    Heading,
    /// Push button.
    Button,
    /// Single-line text input.
    Input,
    /// Checkbox with a label.
    Checkbox,
    /// Page footer.
    Footer,
    /// Standalone image.
    Image,
    /// Small icon image.
    Icon,
    /// Anything the detector labelled that is not in the vocabulary above.
    #[serde(other)]
    Unknown,
}

impl ComponentKind {
    /// Every kind in the vocabulary, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::Frame,
        Self::Nav,
        Self::Text,
        Self::Heading,
        Self::Button,
        Self::Input,
        Self::Checkbox,
        Self::Footer,
        Self::Image,
        Self::Icon,
        Self::Unknown,
    ];

    /// Map a detector label to a kind. Comparison is case-insensitive and
    /// tolerant of surrounding whitespace; unrecognized labels map to `Unknown`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "frame" => Self::Frame,
            "nav" => Self::Nav,
            "text" => Self::Text,
            "heading" => Self::Heading,
            "button" => Self::Button,
            "input" => Self::Input,
            "checkbox" | "radio button" => Self::Checkbox,
            "footer" => Self::Footer,
            "image" => Self::Image,
            "icon" => Self::Icon,
            _ => Self::Unknown,
        }
    }

    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Frame => "frame",
            Self::Nav => "nav",
            Self::Text => "text",
            Self::Heading => "heading",
            Self::Button => "button",
            Self::Input => "input",
            Self::Checkbox => "checkbox",
            Self::Footer => "footer",
            Self::Image => "image",
            Self::Icon => "icon",
            Self::Unknown => "unknown",
        }
    }

    /// Whether `text` is meaningful for this kind.
    #[must_use]
    pub fn carries_text(self) -> bool {
        matches!(
            self,
            Self::Text | Self::Heading | Self::Button | Self::Input | Self::Footer | Self::Checkbox
        )
    }

    /// Whether `img_url` is meaningful for this kind.
    #[must_use]
    pub fn carries_image(self) -> bool {
        matches!(self, Self::Frame | Self::Image | Self::Icon)
    }

    /// Text shown when a component of this kind has no text of its own.
    #[must_use]
    pub fn default_text(self) -> &'static str {
        match self {
            Self::Button => "Submit",
            Self::Heading => "Heading Text",
            Self::Text => "Sample text goes here.",
            Self::Checkbox => "Check me",
            Self::Footer => "Footer Content",
            Self::Frame => "Frame",
            _ => "",
        }
    }
}

/// Corner-form box `[x, y, width, height]` in canonical units.
///
/// Serialized as a four-element array to match the detector and editor wire format.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct CanvasBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width, never negative once stored.
    pub width: f64,
    /// Height, never negative once stored.
    pub height: f64,
}

impl CanvasBox {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Convert a center-form `[cx, cy, w, h]` box to corner form.
    #[must_use]
    pub fn from_center(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self { x: cx - width / 2.0, y: cy - height / 2.0, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether `other` lies inside this box, edges inclusive.
    #[must_use]
    pub fn contains(&self, other: &CanvasBox) -> bool {
        other.x >= self.x && other.right() <= self.right() && other.y >= self.y && other.bottom() <= self.bottom()
    }

    /// Apply the storage policy: negative or non-finite sizes clamp to zero,
    /// non-finite positions clamp to zero.
    #[must_use]
    pub fn sanitized(self) -> Self {
        fn finite_or_zero(v: f64) -> f64 {
            if v.is_finite() { v } else { 0.0 }
        }
        Self {
            x: finite_or_zero(self.x),
            y: finite_or_zero(self.y),
            width: finite_or_zero(self.width).max(0.0),
            height: finite_or_zero(self.height).max(0.0),
        }
    }
}

impl From<[f64; 4]> for CanvasBox {
    fn from([x, y, width, height]: [f64; 4]) -> Self {
        Self { x, y, width, height }
    }
}

impl From<CanvasBox> for [f64; 4] {
    fn from(b: CanvasBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

/// A component as stored in the document and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Unique identifier for this component.
    pub id: ComponentId,
    /// Variant discriminator.
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    /// Geometry in canonical units.
    #[serde(rename = "box")]
    pub bbox: CanvasBox,
    /// Visible text, for kinds that carry text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Background color override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    /// Text color override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Image source, for kinds that carry an image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
    /// Menu entries, for navs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_items: Option<Vec<String>>,
    /// Raw detector label, kept for `Unknown` components so nothing is lost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Component {
    /// A bare component with no text, overrides or media.
    #[must_use]
    pub fn new(id: ComponentId, kind: ComponentKind, bbox: CanvasBox) -> Self {
        Self {
            id,
            kind,
            bbox,
            text: None,
            bg_color: None,
            color: None,
            img_url: None,
            menu_items: None,
            label: None,
        }
    }

    /// Own text, or the kind's default when absent or empty.
    #[must_use]
    pub fn display_text(&self) -> &str {
        match self.text.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => self.kind.default_text(),
        }
    }

    /// Image source, or the kind's placeholder when absent.
    #[must_use]
    pub fn image_source(&self) -> &str {
        match (self.img_url.as_deref(), self.kind) {
            (Some(url), _) if !url.is_empty() => url,
            (_, ComponentKind::Icon) => PLACEHOLDER_ICON_URL,
            _ => PLACEHOLDER_IMAGE_URL,
        }
    }

    /// Menu entries, or the three-item placeholder menu when absent or empty.
    #[must_use]
    pub fn menu(&self) -> Vec<&str> {
        match self.menu_items.as_deref() {
            Some(items) if !items.is_empty() => items.iter().map(String::as_str).collect(),
            _ => DEFAULT_MENU_ITEMS.to_vec(),
        }
    }
}

// =============================================================
// Id allocation
// =============================================================

/// Source of fresh component ids.
pub trait IdAllocator {
    /// Return the next id for `prefix`. Must never repeat for the same prefix.
    fn next_id(&mut self, prefix: &str) -> ComponentId;
}

/// Deterministic allocator producing `prefix-0`, `prefix-1`, ... per prefix.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    counters: HashMap<String, u64>,
}

impl SequentialIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdAllocator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> ComponentId {
        let counter = self.counters.entry(prefix.to_owned()).or_insert(0);
        let id = ComponentId(format!("{prefix}-{counter}"));
        *counter += 1;
        id
    }
}

/// Allocate an id from `ids` that is not already present in `doc`.
pub fn allocate_fresh(ids: &mut dyn IdAllocator, doc: &DocStore, prefix: &str) -> ComponentId {
    loop {
        let id = ids.next_id(prefix);
        if !doc.contains(&id) {
            return id;
        }
    }
}

// =============================================================
// Store
// =============================================================

/// In-memory store of components, keyed by id with insertion order preserved.
///
/// Insertion order is the z-order (later draws above earlier).
#[derive(Debug, Clone, Default)]
pub struct DocStore {
    components: HashMap<ComponentId, Component>,
    order: Vec<ComponentId>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a reference to a component by id.
    #[must_use]
    pub fn get(&self, id: &ComponentId) -> Option<&Component> {
        self.components.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ComponentId) -> bool {
        self.components.contains_key(id)
    }

    /// Insert or fully replace a component. A known id keeps its position in
    /// the order; an unknown id is appended. Returns `true` when a record was
    /// replaced.
    pub fn upsert(&mut self, mut component: Component) -> bool {
        component.bbox = component.bbox.sanitized();
        if self.components.contains_key(&component.id) {
            self.components.insert(component.id.clone(), component);
            true
        } else {
            self.order.push(component.id.clone());
            self.components.insert(component.id.clone(), component);
            false
        }
    }

    /// Append a new component at the top of the order. Returns `false` and
    /// leaves the store untouched if the id is already present.
    pub fn append(&mut self, mut component: Component) -> bool {
        if self.components.contains_key(&component.id) {
            return false;
        }
        component.bbox = component.bbox.sanitized();
        self.order.push(component.id.clone());
        self.components.insert(component.id.clone(), component);
        true
    }

    /// Replace all components with `components`, in order. A repeated id
    /// replaces the earlier record in place.
    pub fn load(&mut self, components: Vec<Component>) {
        self.components.clear();
        self.order.clear();
        for component in components {
            self.upsert(component);
        }
    }

    /// All components in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<&Component> {
        self.order.iter().filter_map(|id| self.components.get(id)).collect()
    }

    /// Owned copy of all components in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Component> {
        self.all().into_iter().cloned().collect()
    }

    /// Number of components currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the store contains no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
