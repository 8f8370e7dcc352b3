//! Input model: mouse buttons, persistent UI state, and the gesture state machine.
//!
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up. Each active variant carries the pixel geometry captured at the
//! start of the gesture plus the live preview rectangle, so the engine can
//! commit a single canonical write on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::{PixelRect, Point};
use crate::doc::ComponentId;
use crate::hit::{ResizeAnchor, Selection};

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// The currently selected component, if any.
    pub selection: Selection,
}

/// Internal state for the gesture state machine: `Idle → Dragging/Resizing → Idle`.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving a component across the canvas.
    DraggingComponent {
        /// Id of the component being dragged.
        id: ComponentId,
        /// Pointer position minus the component's pixel origin at grab time.
        grab_offset: Point,
        /// Pointer position at the start of the drag.
        start_pointer: Point,
        /// Live pixel rectangle shown while dragging.
        preview: PixelRect,
    },
    /// The user is resizing a component by one of its eight handles.
    ResizingComponent {
        /// Id of the component being resized.
        id: ComponentId,
        /// Which corner/edge handle is being dragged.
        anchor: ResizeAnchor,
        /// Pointer position at the start of the resize.
        start_pointer: Point,
        /// Pixel rectangle at the start of the resize.
        orig: PixelRect,
        /// Live pixel rectangle shown while resizing.
        preview: PixelRect,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Id of the component under manipulation, if a gesture is active.
    #[must_use]
    pub fn active_id(&self) -> Option<&ComponentId> {
        match self {
            Self::Idle => None,
            Self::DraggingComponent { id, .. } | Self::ResizingComponent { id, .. } => Some(id),
        }
    }

    /// Live pixel rectangle of the active gesture.
    #[must_use]
    pub fn preview(&self) -> Option<PixelRect> {
        match self {
            Self::Idle => None,
            Self::DraggingComponent { preview, .. } | Self::ResizingComponent { preview, .. } => Some(*preview),
        }
    }
}

/// Compute the rectangle produced by dragging `anchor` of `orig` by `(dx, dy)`.
///
/// Edges that cross each other stop at zero size rather than flipping.
#[must_use]
pub fn resize_rect(orig: PixelRect, anchor: ResizeAnchor, dx: f64, dy: f64) -> PixelRect {
    let mut left = orig.x;
    let mut top = orig.y;
    let mut right = orig.x + orig.width;
    let mut bottom = orig.y + orig.height;

    if anchor.moves_left() {
        left = (left + dx).min(right);
    }
    if anchor.moves_right() {
        right = (right + dx).max(left);
    }
    if anchor.moves_top() {
        top = (top + dy).min(bottom);
    }
    if anchor.moves_bottom() {
        bottom = (bottom + dy).max(top);
    }

    PixelRect::new(left, top, right - left, bottom - top)
}
