use super::*;
use canvas::doc::{CanvasBox, ComponentKind};
use canvas::pdf::PdfError;

use crate::state::test_helpers;

fn button(raw: &str) -> Component {
    Component::new(ComponentId::new(raw), ComponentKind::Button, CanvasBox::new(0.0, 0.0, 64.0, 64.0))
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

fn header<'a>(response: &'a Response, name: &axum::http::HeaderName) -> &'a str {
    response.headers().get(name).unwrap().to_str().unwrap()
}

// =============================================================================
// normalize / detect
// =============================================================================

#[tokio::test]
async fn normalize_drops_containers_and_assigns_ids() {
    let body: DetectionResponse = serde_json::from_str(
        r#"{"detections":[
            {"label":"container","box":[320,320,640,640]},
            {"label":"Button","box":[100,100,80,40],"text":"Go"}
        ]}"#,
    )
    .unwrap();

    let Json(components) = normalize(Json(body)).await;
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].kind, ComponentKind::Button);
    assert_eq!(components[0].id.as_str(), "detection-0");
    assert_eq!(components[0].bbox, CanvasBox::new(60.0, 80.0, 80.0, 40.0));
}

#[tokio::test]
async fn normalize_accepts_missing_detections() {
    let Json(components) = normalize(Json(DetectionResponse::default())).await;
    assert!(components.is_empty());
}

#[tokio::test]
async fn detect_without_detector_is_unavailable() {
    let state = test_helpers::test_app_state();
    let result = detect(State(state), HeaderMap::new(), Bytes::from_static(b"\x89PNG")).await;
    assert_eq!(result.unwrap_err(), StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// codegen
// =============================================================================

#[tokio::test]
async fn codegen_returns_jsx_attachment() {
    let state = test_helpers::test_app_state();
    let body = LayoutBody { components: vec![button("b")], theme: None };

    let response = codegen(State(state), Json(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, &CONTENT_DISPOSITION), "attachment; filename=\"WireframeTemplate.jsx\"");

    let source = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(source.starts_with("import React from 'react';"));
    assert!(source.contains(">Submit</button>"));
}

#[tokio::test]
async fn codegen_uses_requested_theme() {
    let state = test_helpers::test_app_state();
    let body = LayoutBody { components: Vec::new(), theme: Some("dark".into()) };
    let response = codegen(State(state), Json(body)).await.unwrap();
    let source = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(source.contains("backgroundColor: '#1f2937'"));
}

#[tokio::test]
async fn codegen_with_unknown_theme_uses_default() {
    let state = test_helpers::test_app_state();
    let body = LayoutBody { components: Vec::new(), theme: Some("nope".into()) };
    let response = codegen(State(state), Json(body)).await.unwrap();
    let source = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(source.contains("backgroundColor: '#ffffff'"));
}

#[tokio::test]
async fn codegen_clamps_negative_sizes() {
    let state = test_helpers::test_app_state();
    let mut bad = button("b");
    bad.bbox = CanvasBox::new(10.0, 10.0, -64.0, 64.0);
    let body = LayoutBody { components: vec![bad], theme: None };

    let response = codegen(State(state), Json(body)).await.unwrap();
    let source = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(source.contains("width: '0.00%'"));
    assert!(!source.contains("-10.00%"));
}

// =============================================================================
// export.pdf
// =============================================================================

#[tokio::test]
async fn export_returns_pdf_attachment() {
    let state = test_helpers::test_app_state();
    let body = ExportBody {
        components: vec![button("b")],
        theme: None,
        selected: Some(ComponentId::new("b")),
        viewport: Some(ViewportBody { width: 64.0, height: 64.0 }),
    };

    let response = export_pdf(State(state), Json(body)).await.unwrap();
    assert_eq!(header(&response, &CONTENT_TYPE), "application/pdf");
    assert_eq!(header(&response, &CONTENT_DISPOSITION), "attachment; filename=\"wireframe.pdf\"");
    assert!(body_bytes(response).await.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn export_rejects_oversized_viewport() {
    let state = test_helpers::test_app_state();
    let body = ExportBody {
        components: Vec::new(),
        theme: None,
        selected: None,
        viewport: Some(ViewportBody { width: 10_000.0, height: 10_000.0 }),
    };
    let result = export_pdf(State(state), Json(body)).await;
    assert!(matches!(result, Err(StatusCode::BAD_REQUEST)));
}

#[tokio::test]
async fn export_rejects_viewport_past_largest_preset() {
    let state = test_helpers::test_app_state();
    let body = ExportBody {
        components: vec![button("b")],
        theme: None,
        selected: None,
        viewport: Some(ViewportBody { width: 4096.0, height: 4096.0 }),
    };
    let result = export_pdf(State(state), Json(body)).await;
    assert!(matches!(result, Err(StatusCode::BAD_REQUEST)));
}

#[tokio::test]
async fn export_accepts_largest_preset_viewport() {
    let state = test_helpers::test_app_state();
    let body = ExportBody {
        components: vec![button("b")],
        theme: None,
        selected: None,
        viewport: Some(ViewportBody { width: 1000.0, height: 1000.0 }),
    };
    let response = export_pdf(State(state), Json(body)).await.unwrap();
    assert_eq!(header(&response, &CONTENT_TYPE), "application/pdf");
}

// =============================================================================
// status mapping
// =============================================================================

#[test]
fn export_error_to_status_maps_invalid_size() {
    let err = ExportError::Snapshot(SnapshotError::InvalidSize { width: 0, height: 0 });
    assert_eq!(export_error_to_status(err), StatusCode::BAD_REQUEST);
}

#[test]
fn export_error_to_status_maps_internal_failures() {
    let err = ExportError::Snapshot(SnapshotError::Provider("gone".into()));
    assert_eq!(export_error_to_status(err), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(export_error_to_status(ExportError::Pdf(PdfError::EmptyImage)), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn detector_error_to_status_maps_upstream_failures() {
    let status = DetectorError::Status { status: 500, body: String::new() };
    assert_eq!(detector_error_to_status(status), StatusCode::BAD_GATEWAY);

    let parse = serde_json::from_str::<DetectionResponse>("nope").unwrap_err();
    assert_eq!(detector_error_to_status(DetectorError::Parse(parse)), StatusCode::BAD_GATEWAY);

    let build = DetectorError::HttpClientBuild("tls".into());
    assert_eq!(detector_error_to_status(build), StatusCode::INTERNAL_SERVER_ERROR);
}
