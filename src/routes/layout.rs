//! Layout routes: detection normalization, JSX generation, PDF export.
//!
//! Layouts are not stored server-side. Each request carries the whole
//! component list and the response is derived from it alone.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use canvas::camera::Viewport;
use canvas::codegen::{self, GENERATED_FILE_NAME};
use canvas::detect::DetectionResponse;
use canvas::doc::{Component, ComponentId, DocStore};
use canvas::engine::EngineCore;
use canvas::export::{self, DetachedHost, ExportError};
use canvas::hit::Selection;
use canvas::render::{RasterSnapshot, SnapshotError, build_scene};
use canvas::theme::{ResolvedTheme, resolve_theme};
use serde::Deserialize;
use tracing::{info, warn};

use crate::routes::themes::settings_error_to_status;
use crate::services::detector::DetectorError;
use crate::state::AppState;

const DEFAULT_IMAGE_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Deserialize)]
pub struct LayoutBody {
    pub components: Vec<Component>,
    /// Theme key or saved theme name; the active theme when absent.
    #[serde(default)]
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ViewportBody {
    pub width: f64,
    pub height: f64,
}

#[derive(Deserialize)]
pub struct ExportBody {
    pub components: Vec<Component>,
    #[serde(default)]
    pub theme: Option<String>,
    /// Component selected in the editor when the export was requested.
    #[serde(default)]
    pub selected: Option<ComponentId>,
    /// Rendered canvas size; the canonical 640x640 when absent.
    #[serde(default)]
    pub viewport: Option<ViewportBody>,
}

/// `POST /api/layout/normalize` — turn a detector response into components.
pub async fn normalize(Json(body): Json<DetectionResponse>) -> Json<Vec<Component>> {
    Json(load_components(&body))
}

/// `POST /api/layout/detect` — forward a screenshot to the detector and
/// normalize its reply.
pub async fn detect(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Vec<Component>>, StatusCode> {
    let Some(detector) = state.detector.as_ref() else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };
    if body.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_IMAGE_CONTENT_TYPE);
    let response = detector
        .detect(body.to_vec(), content_type)
        .await
        .map_err(detector_error_to_status)?;

    let components = load_components(&response);
    info!(count = components.len(), "layout detected");
    Ok(Json(components))
}

/// `POST /api/layout/codegen` — download the layout as a JSX component.
pub async fn codegen(State(state): State<AppState>, Json(body): Json<LayoutBody>) -> Result<Response, StatusCode> {
    let theme = theme_for(&state, body.theme.as_deref()).await?;
    let mut doc = DocStore::new();
    doc.load(body.components);
    let source = codegen::generate_from_doc(&doc, &theme);
    let disposition = format!("attachment; filename=\"{GENERATED_FILE_NAME}\"");

    Ok((
        [(CONTENT_TYPE, "text/javascript; charset=utf-8"), (CONTENT_DISPOSITION, disposition.as_str())],
        source,
    )
        .into_response())
}

/// `POST /api/layout/export.pdf` — download the rendered layout as a PDF.
pub async fn export_pdf(State(state): State<AppState>, Json(body): Json<ExportBody>) -> Result<Response, StatusCode> {
    let theme = theme_for(&state, body.theme.as_deref()).await?;

    let mut doc = DocStore::new();
    doc.load(body.components);
    let mut selection = Selection::new();
    if let Some(id) = body.selected.as_ref() {
        selection.select(id, &doc);
    }
    let viewport = body.viewport.map_or_else(Viewport::default, |v| Viewport::new(v.width, v.height));

    let scene = build_scene(&doc, &theme, &selection, &viewport);
    let mut host = DetachedHost::new();
    let exported = export::export_pdf(&scene, &theme, &RasterSnapshot, &mut host)
        .await
        .map_err(export_error_to_status)?;
    let disposition = format!("attachment; filename=\"{}\"", exported.file_name);

    Ok(([(CONTENT_TYPE, "application/pdf"), (CONTENT_DISPOSITION, disposition.as_str())], exported.bytes)
        .into_response())
}

fn load_components(response: &DetectionResponse) -> Vec<Component> {
    let mut engine = EngineCore::new();
    engine.load_detections(response);
    engine.doc.snapshot()
}

async fn theme_for(state: &AppState, key: Option<&str>) -> Result<ResolvedTheme, StatusCode> {
    match key {
        Some(key) => {
            let saved = state.themes.saved().await.map_err(settings_error_to_status)?;
            Ok(resolve_theme(key, &saved))
        }
        None => state.themes.resolve_active().await.map_err(settings_error_to_status),
    }
}

pub(crate) fn export_error_to_status(err: ExportError) -> StatusCode {
    match err {
        ExportError::Snapshot(SnapshotError::InvalidSize { .. }) => StatusCode::BAD_REQUEST,
        ExportError::Snapshot(_) | ExportError::Decode(_) | ExportError::Pdf(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn detector_error_to_status(err: DetectorError) -> StatusCode {
    warn!(error = %err, "detector call failed");
    match err {
        DetectorError::HttpClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DetectorError::Request(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        DetectorError::Request(_) | DetectorError::Status { .. } | DetectorError::Parse(_) => StatusCode::BAD_GATEWAY,
    }
}
