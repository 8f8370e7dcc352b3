#![allow(clippy::float_cmp)]

use super::*;

fn rect() -> PixelRect {
    PixelRect::new(100.0, 100.0, 50.0, 40.0)
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    let state = InputState::default();
    assert!(state.is_idle());
    assert!(state.active_id().is_none());
    assert!(state.preview().is_none());
}

#[test]
fn dragging_reports_id_and_preview() {
    let state = InputState::DraggingComponent {
        id: ComponentId::from("a"),
        grab_offset: Point::new(5.0, 5.0),
        start_pointer: Point::new(105.0, 105.0),
        preview: rect(),
    };
    assert!(!state.is_idle());
    assert_eq!(state.active_id(), Some(&ComponentId::from("a")));
    assert_eq!(state.preview(), Some(rect()));
}

#[test]
fn ui_state_default_has_no_selection() {
    assert!(UiState::default().selection.get().is_none());
}

// =============================================================
// resize_rect
// =============================================================

#[test]
fn resize_se_grows_width_and_height() {
    let r = resize_rect(rect(), ResizeAnchor::Se, 10.0, 20.0);
    assert_eq!(r, PixelRect::new(100.0, 100.0, 60.0, 60.0));
}

#[test]
fn resize_nw_moves_origin_and_shrinks() {
    let r = resize_rect(rect(), ResizeAnchor::Nw, 10.0, 10.0);
    assert_eq!(r, PixelRect::new(110.0, 110.0, 40.0, 30.0));
}

#[test]
fn resize_n_only_touches_vertical_axis() {
    let r = resize_rect(rect(), ResizeAnchor::N, 99.0, -10.0);
    assert_eq!(r, PixelRect::new(100.0, 90.0, 50.0, 50.0));
}

#[test]
fn resize_w_past_right_edge_stops_at_zero_width() {
    let r = resize_rect(rect(), ResizeAnchor::W, 500.0, 0.0);
    assert_eq!(r.width, 0.0);
    assert_eq!(r.x, 150.0);
}

#[test]
fn resize_s_past_top_edge_stops_at_zero_height() {
    let r = resize_rect(rect(), ResizeAnchor::S, 0.0, -500.0);
    assert_eq!(r.height, 0.0);
    assert_eq!(r.y, 100.0);
}
