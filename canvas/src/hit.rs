//! Hit-testing and single-selection state.
//!
//! Pointer-down handling is expressed as an explicit bubbling chain of
//! [`PointerHandler`]s: the component handler runs first and consumes the
//! event when it selects something, so the document-level "outside click"
//! handler later in the chain never sees it. The ordering is a property of
//! [`dispatch_pointer_down`], not of listener registration.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{PixelRect, Point, Viewport};
use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{ComponentId, DocStore};

/// Which part of a component was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [Self; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Handle center on `rect`, in pixels.
    #[must_use]
    pub fn position(self, rect: &PixelRect) -> Point {
        let cx = rect.x + rect.width / 2.0;
        let cy = rect.y + rect.height / 2.0;
        let right = rect.x + rect.width;
        let bottom = rect.y + rect.height;
        match self {
            Self::N => Point::new(cx, rect.y),
            Self::Ne => Point::new(right, rect.y),
            Self::E => Point::new(right, cy),
            Self::Se => Point::new(right, bottom),
            Self::S => Point::new(cx, bottom),
            Self::Sw => Point::new(rect.x, bottom),
            Self::W => Point::new(rect.x, cy),
            Self::Nw => Point::new(rect.x, rect.y),
        }
    }

    /// Whether dragging this handle moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Nw | Self::W | Self::Sw)
    }

    /// Whether dragging this handle moves the right edge.
    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::Ne | Self::E | Self::Se)
    }

    /// Whether dragging this handle moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::Nw | Self::N | Self::Ne)
    }

    /// Whether dragging this handle moves the bottom edge.
    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::Sw | Self::S | Self::Se)
    }

    /// CSS cursor name shown while hovering or dragging this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub component_id: ComponentId,
    pub part: HitPart,
}

/// Test which component (if any) is under the pixel point `pt`.
///
/// Handles of the selected component are checked first, then bodies from the
/// top of the z-order down.
#[must_use]
pub fn hit_test(pt: Point, doc: &DocStore, viewport: &Viewport, selected: Option<&ComponentId>) -> Option<Hit> {
    if let Some(component) = selected.and_then(|id| doc.get(id)) {
        let rect = viewport.canonical_to_pixel(component.bbox);
        for anchor in ResizeAnchor::ALL {
            let handle = anchor.position(&rect);
            if (pt.x - handle.x).hypot(pt.y - handle.y) <= HANDLE_RADIUS_PX {
                return Some(Hit { component_id: component.id.clone(), part: HitPart::ResizeHandle(anchor) });
            }
        }
    }

    doc.all()
        .into_iter()
        .rev()
        .find(|c| viewport.canonical_to_pixel(c.bbox).contains(pt))
        .map(|c| Hit { component_id: c.id.clone(), part: HitPart::Body })
}

// =============================================================
// Selection
// =============================================================

/// Zero or one selected component. Only ids present in the document can be selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<ComponentId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> Option<&ComponentId> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn is_selected(&self, id: &ComponentId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Select `id` if it exists in `doc`. Returns whether the selection changed.
    pub fn select(&mut self, id: &ComponentId, doc: &DocStore) -> bool {
        if !doc.contains(id) || self.is_selected(id) {
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    /// Clear the selection. Returns whether anything was selected.
    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }

    /// Drop the selection if its id is no longer in `doc`.
    pub fn retain_valid(&mut self, doc: &DocStore) -> bool {
        match &self.selected {
            Some(id) if !doc.contains(id) => self.clear(),
            _ => false,
        }
    }
}

// =============================================================
// Pointer dispatch
// =============================================================

/// Where a pointer-down landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// A component's surface.
    Component(ComponentId),
    /// The canvas itself, between components.
    CanvasBackground,
    /// An open edit panel (property sidebar, palette).
    EditPanel,
    /// Anywhere else in the document.
    Outside,
}

/// A pointer-down travelling up the handler chain.
#[derive(Debug, Clone)]
pub struct PointerDown {
    target: PointerTarget,
    consumed: bool,
}

impl PointerDown {
    #[must_use]
    pub fn new(target: PointerTarget) -> Self {
        Self { target, consumed: false }
    }

    #[must_use]
    pub fn target(&self) -> &PointerTarget {
        &self.target
    }

    /// Stop the event from reaching later handlers.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// A link in the pointer-down chain.
pub trait PointerHandler {
    fn on_pointer_down(&self, event: &mut PointerDown, selection: &mut Selection, doc: &DocStore);
}

/// Target phase: a hit on a live component selects it and consumes the event.
pub struct ComponentHitHandler;

impl PointerHandler for ComponentHitHandler {
    fn on_pointer_down(&self, event: &mut PointerDown, selection: &mut Selection, doc: &DocStore) {
        if let PointerTarget::Component(id) = event.target() {
            if doc.contains(id) {
                let id = id.clone();
                selection.select(&id, doc);
                event.consume();
            }
        }
    }
}

/// Canvas phase: a press on the bare canvas clears the selection.
pub struct CanvasBackgroundHandler;

impl PointerHandler for CanvasBackgroundHandler {
    fn on_pointer_down(&self, event: &mut PointerDown, selection: &mut Selection, _doc: &DocStore) {
        if *event.target() == PointerTarget::CanvasBackground {
            selection.clear();
            event.consume();
        }
    }
}

/// Document phase: anything not consumed earlier and not inside an edit
/// panel clears the selection.
pub struct OutsideClickHandler;

impl PointerHandler for OutsideClickHandler {
    fn on_pointer_down(&self, event: &mut PointerDown, selection: &mut Selection, _doc: &DocStore) {
        if event.is_consumed() || *event.target() == PointerTarget::EditPanel {
            return;
        }
        selection.clear();
    }
}

/// Run a pointer-down through the chain in bubbling order, stopping at the
/// first handler that consumes it. Returns whether the selection changed.
pub fn dispatch_pointer_down(target: PointerTarget, selection: &mut Selection, doc: &DocStore) -> bool {
    let chain: [&dyn PointerHandler; 3] = [&ComponentHitHandler, &CanvasBackgroundHandler, &OutsideClickHandler];
    let before = selection.clone();
    let mut event = PointerDown::new(target);
    for handler in chain {
        handler.on_pointer_down(&mut event, selection, doc);
        if event.is_consumed() {
            break;
        }
    }
    *selection != before
}
