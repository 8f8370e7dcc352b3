//! Interaction engine: the single writer of the document during editing.
//!
//! `EngineCore` owns the document, the current viewport, the selection and
//! the gesture state machine. Every input handler returns a list of
//! [`Action`]s for the host to act on (re-render, change the cursor, persist a
//! record) instead of touching the host directly, so the whole editor can be
//! driven from tests.
//!
//! DESIGN
//! ======
//! Geometry writes always read the *current* record, build a full next
//! record, and hand it to `DocStore::upsert`. A gesture whose id has vanished
//! from the document (the model was reloaded mid-gesture) does nothing.
//! Pixel-space constraints (snap grid, keep inside the container) are applied
//! before the inverse transform so the stored box is always what the user saw.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::camera::{PixelRect, Point, Viewport};
use crate::consts::{CLICK_SLOP_PX, DEFAULT_MENU_ITEMS, DROP_BUTTON_BG, DROP_HEIGHT, DROP_WIDTH};
use crate::detect::{DetectionResponse, normalize_response};
use crate::doc::{
    CanvasBox, Component, ComponentId, ComponentKind, DocStore, IdAllocator, SequentialIds, allocate_fresh,
};
use crate::hit::{HitPart, PointerTarget, dispatch_pointer_down, hit_test};
use crate::input::{Button, InputState, UiState, resize_rect};

/// Id prefix for components dropped from the palette.
pub const DROP_ID_PREFIX: &str = "added";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ComponentCreated(Component),
    ComponentUpdated(Component),
    SelectionChanged(Option<ComponentId>),
    SetCursor(String),
    RenderNeeded,
}

/// Drag and resize constraints, in container pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Keep every box inside the container while moving or resizing.
    pub bounds_to_parent: bool,
    /// Snap positions and sizes to multiples of this many pixels.
    pub grid: Option<f64>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { bounds_to_parent: true, grid: None }
    }
}

/// Core engine state. Host independent, so it can be tested directly.
pub struct EngineCore {
    pub doc: DocStore,
    pub viewport: Viewport,
    pub ui: UiState,
    pub input: InputState,
    pub options: EngineOptions,
    ids: Box<dyn IdAllocator + Send>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_ids(SequentialIds::new())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine drawing fresh ids from `ids`.
    #[must_use]
    pub fn with_ids(ids: impl IdAllocator + Send + 'static) -> Self {
        Self {
            doc: DocStore::new(),
            viewport: Viewport::default(),
            ui: UiState::default(),
            input: InputState::default(),
            options: EngineOptions::default(),
            ids: Box::new(ids),
        }
    }

    // --- Data inputs ---

    /// Replace the document with a normalized detector response.
    ///
    /// Any gesture or selection referring to an id that did not survive the
    /// reload is dropped.
    pub fn load_detections(&mut self, response: &DetectionResponse) -> Vec<Action> {
        let components = normalize_response(response, self.ids.as_mut());
        self.doc.load(components);

        if self.input.active_id().is_some_and(|id| !self.doc.contains(id)) {
            self.input = InputState::Idle;
        }

        let mut actions = Vec::new();
        if self.ui.selection.retain_valid(&self.doc) {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Record the container's current rendered size.
    pub fn set_viewport(&mut self, width_px: f64, height_px: f64) -> Vec<Action> {
        self.viewport = Viewport::new(width_px, height_px);
        vec![Action::RenderNeeded]
    }

    // --- Gesture completion ---

    /// Commit a finished drag: the component's top-left now sits at `pixel_pos`.
    /// Only `x` and `y` change.
    pub fn drag_stop(&mut self, id: &ComponentId, pixel_pos: Point) -> Vec<Action> {
        let Some(current) = self.doc.get(id) else {
            return Vec::new();
        };
        let size = self.viewport.canonical_to_pixel(current.bbox);
        let rect = self.constrain_move(PixelRect::new(pixel_pos.x, pixel_pos.y, size.width, size.height));
        let origin = self.viewport.pixel_to_canonical_point(rect.origin());

        let mut next = current.clone();
        next.bbox = CanvasBox::new(origin.x, origin.y, current.bbox.width, current.bbox.height);
        self.commit(next)
    }

    /// Commit a finished resize: position and size both come from `pixel_rect`.
    pub fn resize_stop(&mut self, id: &ComponentId, pixel_rect: PixelRect) -> Vec<Action> {
        let Some(current) = self.doc.get(id) else {
            return Vec::new();
        };
        let rect = self.constrain_resize(pixel_rect);

        let mut next = current.clone();
        next.bbox = self.viewport.pixel_to_canonical(rect);
        self.commit(next)
    }

    // --- Pointer input ---

    /// Begin a gesture or change the selection.
    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }

        let Some(hit) = hit_test(pt, &self.doc, &self.viewport, self.ui.selection.get()) else {
            self.input = InputState::Idle;
            return self.pointer_down_target(PointerTarget::CanvasBackground);
        };

        let mut actions = self.pointer_down_target(PointerTarget::Component(hit.component_id.clone()));
        let Some(component) = self.doc.get(&hit.component_id) else {
            return actions;
        };
        let rect = self.viewport.canonical_to_pixel(component.bbox);

        match hit.part {
            HitPart::Body => {
                self.input = InputState::DraggingComponent {
                    id: hit.component_id,
                    grab_offset: Point::new(pt.x - rect.x, pt.y - rect.y),
                    start_pointer: pt,
                    preview: rect,
                };
                actions.push(Action::SetCursor("move".into()));
            }
            HitPart::ResizeHandle(anchor) => {
                self.input = InputState::ResizingComponent {
                    id: hit.component_id,
                    anchor,
                    start_pointer: pt,
                    orig: rect,
                    preview: rect,
                };
                actions.push(Action::SetCursor(anchor.cursor().into()));
            }
        }
        actions
    }

    /// Track the pointer: update the live preview, or the hover cursor when idle.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        if self.input.is_idle() {
            let cursor = match hit_test(pt, &self.doc, &self.viewport, self.ui.selection.get()) {
                Some(hit) => match hit.part {
                    HitPart::Body => "move",
                    HitPart::ResizeHandle(anchor) => anchor.cursor(),
                },
                None => "default",
            };
            return vec![Action::SetCursor(cursor.into())];
        }

        let next = self.preview_at(pt);
        match &mut self.input {
            InputState::Idle => {}
            InputState::DraggingComponent { preview, .. } | InputState::ResizingComponent { preview, .. } => {
                *preview = next;
            }
        }
        vec![Action::RenderNeeded]
    }

    /// Finish the active gesture and commit its result to the document.
    pub fn on_pointer_up(&mut self, pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || self.input.is_idle() {
            return Vec::new();
        }

        let preview = self.preview_at(pt);
        let state = std::mem::take(&mut self.input);
        let mut actions = match state {
            InputState::Idle => Vec::new(),
            InputState::DraggingComponent { start_pointer, .. } | InputState::ResizingComponent { start_pointer, .. }
                if is_click(start_pointer, pt) =>
            {
                Vec::new()
            }
            InputState::DraggingComponent { id, .. } => self.drag_stop(&id, preview.origin()),
            InputState::ResizingComponent { id, .. } => self.resize_stop(&id, preview),
        };
        actions.push(Action::SetCursor("default".into()));
        actions
    }

    /// Route a pointer-down on `target` through the selection handler chain.
    pub fn pointer_down_target(&mut self, target: PointerTarget) -> Vec<Action> {
        if dispatch_pointer_down(target, &mut self.ui.selection, &self.doc) {
            vec![Action::SelectionChanged(self.ui.selection.get().cloned()), Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Palette and property edits ---

    /// Create a component of `kind` with its top-left at `pixel_point` and select it.
    pub fn drop_component(&mut self, kind: ComponentKind, pixel_point: Point) -> Vec<Action> {
        let origin = self.viewport.pixel_to_canonical_point(pixel_point);
        let id = allocate_fresh(self.ids.as_mut(), &self.doc, DROP_ID_PREFIX);

        let bbox = CanvasBox::new(origin.x, origin.y, DROP_WIDTH, DROP_HEIGHT);
        let mut component = Component::new(id.clone(), kind, bbox);
        component.text = Some(String::new());
        match kind {
            ComponentKind::Button => component.bg_color = Some(DROP_BUTTON_BG.to_owned()),
            ComponentKind::Nav => {
                component.menu_items = Some(DEFAULT_MENU_ITEMS.iter().map(|s| (*s).to_owned()).collect());
            }
            _ => {}
        }

        if !self.doc.append(component) {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if let Some(stored) = self.doc.get(&id) {
            actions.push(Action::ComponentCreated(stored.clone()));
        }
        self.ui.selection.select(&id, &self.doc);
        actions.push(Action::SelectionChanged(Some(id)));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Replace a component with a full edited record from the property editor.
    pub fn edit_component(&mut self, component: Component) -> Vec<Action> {
        if !self.doc.contains(&component.id) {
            return Vec::new();
        }
        self.commit(component)
    }

    /// Inline text edit.
    pub fn set_text(&mut self, id: &ComponentId, text: String) -> Vec<Action> {
        let Some(current) = self.doc.get(id) else {
            return Vec::new();
        };
        let mut next = current.clone();
        next.text = Some(text);
        self.commit(next)
    }

    /// Replace a nav's menu entries.
    pub fn set_menu_items(&mut self, id: &ComponentId, items: Vec<String>) -> Vec<Action> {
        let Some(current) = self.doc.get(id) else {
            return Vec::new();
        };
        let mut next = current.clone();
        next.menu_items = Some(items);
        self.commit(next)
    }

    // --- Queries ---

    /// The currently selected component id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&ComponentId> {
        self.ui.selection.get()
    }

    #[must_use]
    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.doc.get(id)
    }

    // --- Internals ---

    fn commit(&mut self, next: Component) -> Vec<Action> {
        let id = next.id.clone();
        self.doc.upsert(next);
        match self.doc.get(&id) {
            Some(stored) => vec![Action::ComponentUpdated(stored.clone()), Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    /// Live pixel rectangle of the active gesture with the pointer at `pt`.
    fn preview_at(&self, pt: Point) -> PixelRect {
        match &self.input {
            InputState::Idle => PixelRect::default(),
            InputState::DraggingComponent { grab_offset, preview, .. } => self.constrain_move(PixelRect::new(
                pt.x - grab_offset.x,
                pt.y - grab_offset.y,
                preview.width,
                preview.height,
            )),
            InputState::ResizingComponent { anchor, start_pointer, orig, .. } => {
                let resized = resize_rect(*orig, *anchor, pt.x - start_pointer.x, pt.y - start_pointer.y);
                self.constrain_resize(resized)
            }
        }
    }

    fn snap(&self, v: f64) -> f64 {
        match self.options.grid {
            Some(g) if g > 0.0 => (v / g).round() * g,
            _ => v,
        }
    }

    /// Snap the origin and keep the whole box inside the container.
    fn constrain_move(&self, rect: PixelRect) -> PixelRect {
        let mut x = self.snap(rect.x);
        let mut y = self.snap(rect.y);
        if self.options.bounds_to_parent {
            x = x.min(self.viewport.width_px() - rect.width).max(0.0);
            y = y.min(self.viewport.height_px() - rect.height).max(0.0);
        }
        PixelRect::new(x, y, rect.width, rect.height)
    }

    /// Snap all four edges and trim whatever overhangs the container.
    fn constrain_resize(&self, rect: PixelRect) -> PixelRect {
        let mut left = self.snap(rect.x);
        let mut top = self.snap(rect.y);
        let mut right = self.snap(rect.x + rect.width).max(left);
        let mut bottom = self.snap(rect.y + rect.height).max(top);
        if self.options.bounds_to_parent {
            left = left.max(0.0);
            top = top.max(0.0);
            right = right.min(self.viewport.width_px()).max(left);
            bottom = bottom.min(self.viewport.height_px()).max(top);
        }
        PixelRect::new(left, top, right - left, bottom - top)
    }
}

/// A release within [`CLICK_SLOP_PX`] of the press on both axes is a click.
fn is_click(start: Point, end: Point) -> bool {
    (end.x - start.x).abs() < CLICK_SLOP_PX && (end.y - start.y).abs() < CLICK_SLOP_PX
}
