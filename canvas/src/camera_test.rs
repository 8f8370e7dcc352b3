#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn box_approx_eq(a: CanvasBox, b: CanvasBox) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.width, b.width) && approx_eq(a.height, b.height)
}

// --- Point / PixelRect ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn pixel_rect_contains_is_edge_inclusive() {
    let r = PixelRect::new(10.0, 10.0, 20.0, 20.0);
    assert!(r.contains(Point::new(10.0, 30.0)));
    assert!(!r.contains(Point::new(9.9, 15.0)));
}

// --- Viewport defaults ---

#[test]
fn viewport_default_is_canonical_size() {
    let vp = Viewport::default();
    assert_eq!(vp.width_px(), CANVAS_SIZE);
    assert_eq!(vp.height_px(), CANVAS_SIZE);
    assert_eq!(vp.scale_x(), 1.0);
}

#[test]
fn viewport_clamps_degenerate_sides() {
    let vp = Viewport::new(0.0, -5.0);
    assert_eq!(vp.width_px(), 1.0);
    assert_eq!(vp.height_px(), 1.0);
    let vp = Viewport::new(f64::NAN, 100.0);
    assert_eq!(vp.width_px(), 1.0);
}

// --- canonical_to_pixel ---

#[test]
fn canonical_to_pixel_identity_at_canonical_size() {
    let vp = Viewport::default();
    let r = vp.canonical_to_pixel(CanvasBox::new(10.0, 20.0, 30.0, 40.0));
    assert_eq!(r, PixelRect::new(10.0, 20.0, 30.0, 40.0));
}

#[test]
fn canonical_to_pixel_scales_each_axis_independently() {
    let vp = Viewport::new(1280.0, 320.0);
    let r = vp.canonical_to_pixel(CanvasBox::new(64.0, 64.0, 320.0, 640.0));
    assert!(approx_eq(r.x, 128.0));
    assert!(approx_eq(r.y, 32.0));
    assert!(approx_eq(r.width, 640.0));
    assert!(approx_eq(r.height, 320.0));
}

// --- pixel_to_canonical ---

#[test]
fn pixel_to_canonical_inverts_scale() {
    let vp = Viewport::new(800.0, 800.0);
    let b = vp.pixel_to_canonical(PixelRect::new(80.0, 400.0, 200.0, 100.0));
    assert!(box_approx_eq(b, CanvasBox::new(64.0, 320.0, 160.0, 80.0)));
}

#[test]
fn point_transforms_are_inverse() {
    let vp = Viewport::new(333.0, 917.0);
    let pt = Point::new(123.4, 567.8);
    let back = vp.pixel_to_canonical_point(vp.canonical_to_pixel_point(pt));
    assert!(approx_eq(back.x, pt.x));
    assert!(approx_eq(back.y, pt.y));
}

// --- round trip over many sizes ---

#[test]
fn round_trip_is_identity_across_sizes_and_boxes() {
    let sizes = [(1.0, 1.0), (37.0, 911.0), (640.0, 640.0), (800.0, 600.0), (1920.0, 1080.0), (4096.5, 3.25)];
    let boxes = [
        CanvasBox::new(0.0, 0.0, 0.0, 0.0),
        CanvasBox::new(100.0, 100.0, 120.0, 60.0),
        CanvasBox::new(639.9, 0.1, 0.5, 639.0),
        CanvasBox::new(-20.0, 700.0, 33.3, 12.7),
    ];
    for (w, h) in sizes {
        let vp = Viewport::new(w, h);
        for b in boxes {
            let back = vp.pixel_to_canonical(vp.canonical_to_pixel(b));
            assert!(box_approx_eq(back, b), "round trip failed for {b:?} at {w}x{h}: {back:?}");
        }
    }
}

// --- presets ---

#[test]
fn size_presets_are_square() {
    assert_eq!(CanvasSizePreset::Small.viewport(), Viewport::new(600.0, 600.0));
    assert_eq!(CanvasSizePreset::default(), CanvasSizePreset::Medium);
    assert_eq!(CanvasSizePreset::Large.max_width_px(), 1000.0);
}
