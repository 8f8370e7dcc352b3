use super::*;
use crate::doc::{CanvasBox, Component, ComponentKind};

fn doc_with(boxes: &[(&str, CanvasBox)]) -> DocStore {
    let mut doc = DocStore::new();
    for (id, b) in boxes {
        doc.append(Component::new(ComponentId::from(*id), ComponentKind::Button, *b));
    }
    doc
}

fn id(raw: &str) -> ComponentId {
    ComponentId::from(raw)
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn hit_test_empty_doc_returns_none() {
    let doc = DocStore::new();
    assert!(hit_test(Point::new(10.0, 10.0), &doc, &Viewport::default(), None).is_none());
}

#[test]
fn hit_test_returns_topmost_body() {
    let doc = doc_with(&[
        ("below", CanvasBox::new(0.0, 0.0, 200.0, 200.0)),
        ("above", CanvasBox::new(50.0, 50.0, 50.0, 50.0)),
    ]);
    let hit = hit_test(Point::new(60.0, 60.0), &doc, &Viewport::default(), None).unwrap();
    assert_eq!(hit.component_id, id("above"));
    assert_eq!(hit.part, HitPart::Body);
}

#[test]
fn hit_test_respects_viewport_scale() {
    let doc = doc_with(&[("a", CanvasBox::new(320.0, 320.0, 64.0, 64.0))]);
    let vp = Viewport::new(320.0, 320.0);
    assert!(hit_test(Point::new(170.0, 170.0), &doc, &vp, None).is_some());
    assert!(hit_test(Point::new(330.0, 330.0), &doc, &vp, None).is_none());
}

#[test]
fn hit_test_prefers_selected_handles() {
    let doc = doc_with(&[("a", CanvasBox::new(100.0, 100.0, 100.0, 100.0))]);
    let selected = id("a");
    let hit = hit_test(Point::new(201.0, 199.0), &doc, &Viewport::default(), Some(&selected)).unwrap();
    assert_eq!(hit.part, HitPart::ResizeHandle(ResizeAnchor::Se));
}

#[test]
fn hit_test_ignores_handles_of_unselected() {
    let doc = doc_with(&[("a", CanvasBox::new(100.0, 100.0, 100.0, 100.0))]);
    let hit = hit_test(Point::new(200.0, 200.0), &doc, &Viewport::default(), None).unwrap();
    assert_eq!(hit.part, HitPart::Body);
}

#[test]
fn anchor_edges_are_consistent() {
    for anchor in ResizeAnchor::ALL {
        assert!(!(anchor.moves_left() && anchor.moves_right()));
        assert!(!(anchor.moves_top() && anchor.moves_bottom()));
        assert!(!anchor.cursor().is_empty());
    }
}

// =============================================================
// Selection
// =============================================================

#[test]
fn selection_starts_empty() {
    assert!(Selection::new().get().is_none());
}

#[test]
fn selection_rejects_ids_not_in_doc() {
    let doc = doc_with(&[("a", CanvasBox::default())]);
    let mut sel = Selection::new();
    assert!(!sel.select(&id("ghost"), &doc));
    assert!(sel.get().is_none());
}

#[test]
fn selection_select_then_clear() {
    let doc = doc_with(&[("a", CanvasBox::default())]);
    let mut sel = Selection::new();
    assert!(sel.select(&id("a"), &doc));
    assert!(sel.is_selected(&id("a")));
    assert!(sel.clear());
    assert!(!sel.clear());
}

#[test]
fn selection_retain_valid_prunes_missing_id() {
    let mut doc = doc_with(&[("a", CanvasBox::default())]);
    let mut sel = Selection::new();
    sel.select(&id("a"), &doc);
    doc.load(Vec::new());
    assert!(sel.retain_valid(&doc));
    assert!(sel.get().is_none());
}

// =============================================================
// Pointer dispatch
// =============================================================

#[test]
fn component_hit_selects_and_survives_outside_handler() {
    let doc = doc_with(&[("a", CanvasBox::default())]);
    let mut sel = Selection::new();
    assert!(dispatch_pointer_down(PointerTarget::Component(id("a")), &mut sel, &doc));
    assert_eq!(sel.get(), Some(&id("a")));
}

#[test]
fn background_press_clears_selection() {
    let doc = doc_with(&[("a", CanvasBox::default())]);
    let mut sel = Selection::new();
    dispatch_pointer_down(PointerTarget::Component(id("a")), &mut sel, &doc);
    assert!(dispatch_pointer_down(PointerTarget::CanvasBackground, &mut sel, &doc));
    assert!(sel.get().is_none());
}

#[test]
fn outside_press_clears_selection() {
    let doc = doc_with(&[("a", CanvasBox::default())]);
    let mut sel = Selection::new();
    dispatch_pointer_down(PointerTarget::Component(id("a")), &mut sel, &doc);
    dispatch_pointer_down(PointerTarget::Outside, &mut sel, &doc);
    assert!(sel.get().is_none());
}

#[test]
fn edit_panel_press_keeps_selection() {
    let doc = doc_with(&[("a", CanvasBox::default())]);
    let mut sel = Selection::new();
    dispatch_pointer_down(PointerTarget::Component(id("a")), &mut sel, &doc);
    assert!(!dispatch_pointer_down(PointerTarget::EditPanel, &mut sel, &doc));
    assert_eq!(sel.get(), Some(&id("a")));
}

#[test]
fn stale_component_hit_falls_through_to_outside_handler() {
    let doc = doc_with(&[("a", CanvasBox::default())]);
    let mut sel = Selection::new();
    dispatch_pointer_down(PointerTarget::Component(id("a")), &mut sel, &doc);
    dispatch_pointer_down(PointerTarget::Component(id("gone")), &mut sel, &doc);
    assert!(sel.get().is_none());
}

#[test]
fn outside_handler_alone_would_clear_a_fresh_selection() {
    let doc = doc_with(&[("a", CanvasBox::default())]);
    let mut sel = Selection::new();
    let mut event = PointerDown::new(PointerTarget::Component(id("a")));
    ComponentHitHandler.on_pointer_down(&mut event, &mut sel, &doc);
    assert!(event.is_consumed());

    // Without consumption the document handler undoes the selection.
    let mut unconsumed = PointerDown::new(PointerTarget::Component(id("a")));
    OutsideClickHandler.on_pointer_down(&mut unconsumed, &mut sel, &doc);
    assert!(sel.get().is_none());
}
