use super::*;
use crate::camera::Viewport;
use crate::consts::PLACEHOLDER_ICON_URL;
use crate::doc::{CanvasBox, Component, ComponentId, ComponentKind, DocStore};
use crate::hit::Selection;
use crate::render::{RasterSnapshot, SELECTION_OUTLINE, build_scene, parse_color, rasterize};
use crate::theme::{builtin_theme, default_theme};

struct FailingProvider;

#[async_trait::async_trait]
impl SnapshotProvider for FailingProvider {
    async fn capture(&self, _request: CaptureRequest<'_>) -> Result<Vec<u8>, SnapshotError> {
        Err(SnapshotError::Provider("surface lost".into()))
    }
}

struct GarbageProvider;

#[async_trait::async_trait]
impl SnapshotProvider for GarbageProvider {
    async fn capture(&self, _request: CaptureRequest<'_>) -> Result<Vec<u8>, SnapshotError> {
        Ok(b"not a png".to_vec())
    }
}

fn light() -> ResolvedTheme {
    default_theme().tokens.resolve()
}

fn selected_scene() -> SceneNode {
    let mut doc = DocStore::new();
    doc.append(Component::new(ComponentId::from("a"), ComponentKind::Text, CanvasBox::new(64.0, 64.0, 128.0, 128.0)));
    doc.append(Component::new(ComponentId::from("i"), ComponentKind::Icon, CanvasBox::new(300.0, 300.0, 64.0, 64.0)));
    let mut selection = Selection::new();
    selection.select(&ComponentId::from("a"), &doc);
    build_scene(&doc, &light(), &selection, &Viewport::default())
}

fn released(host: &DetachedHost) -> bool {
    let events = host.events();
    events.contains(&HostEvent::Detached) && events.contains(&HostEvent::ProgressHidden) && host.offscreen().is_none()
}

// =============================================================================
// Clone preparation
// =============================================================================

#[test]
fn clone_drops_selection_affordances() {
    let scene = selected_scene();
    let clone = prepare_export_tree(&scene);
    let node = clone.find_component(&ComponentId::from("a")).unwrap();
    assert!(node.style.outline.is_none());
    assert!(node.style.shadow.is_none());
    assert!(!node.has_class("outline-4"));
    assert!(!node.has_class("outline-blue-500"));
    assert!(!node.has_class("shadow-lg"));
    assert!(node.has_class("z-20"));
}

#[test]
fn root_keeps_its_frame() {
    let clone = prepare_export_tree(&selected_scene());
    assert!(clone.has_class("border"));
    assert!(clone.style.border.is_some());
}

#[test]
fn original_tree_is_untouched() {
    let scene = selected_scene();
    let before = scene.clone();
    let _clone = prepare_export_tree(&scene);
    assert_eq!(scene, before);
}

#[test]
fn external_icons_are_embedded() {
    let scene = selected_scene();
    let clone = prepare_export_tree(&scene);
    let icon = clone.find_component(&ComponentId::from("i")).unwrap();
    assert_eq!(icon.img_src.as_deref(), Some(ICON_DATA_URI));
    let original = scene.find_component(&ComponentId::from("i")).unwrap();
    assert_eq!(original.img_src.as_deref(), Some(PLACEHOLDER_ICON_URL));
}

#[test]
fn affordance_class_matching() {
    assert!(is_affordance_class("border"));
    assert!(is_affordance_class("border-dashed"));
    assert!(is_affordance_class("hover:shadow-md"));
    assert!(is_affordance_class("outline-4"));
    assert!(!is_affordance_class("rounded-lg"));
    assert!(!is_affordance_class("noborder"));
}

#[test]
fn exported_raster_has_no_selection_outline() {
    let clone = prepare_export_tree(&selected_scene());
    let img = rasterize(CaptureRequest { node: &clone, scale: EXPORT_SCALE, background: "#ffffff" }).unwrap();
    let outline = parse_color(SELECTION_OUTLINE).unwrap();
    assert!(img.pixels().all(|p| *p != outline));
}

// =============================================================================
// Pipeline
// =============================================================================

#[tokio::test]
async fn export_produces_pdf_and_releases_host() {
    let mut host = DetachedHost::new();
    let doc = export_pdf(&selected_scene(), &light(), &RasterSnapshot, &mut host).await.unwrap();

    assert_eq!(doc.file_name, PDF_FILE_NAME);
    assert!(doc.bytes.starts_with(b"%PDF-"));
    assert_eq!((doc.width, doc.height), (1280, 1280));
    assert!(released(&host));
    assert!(host.events().contains(&HostEvent::Progress(SUCCESS_MESSAGE.into())));
    assert!(host.failure().is_none());
}

#[tokio::test]
async fn export_stages_clone_before_capture() {
    let mut host = DetachedHost::new();
    export_pdf(&selected_scene(), &light(), &RasterSnapshot, &mut host).await.unwrap();
    assert_eq!(
        &host.events()[..2],
        &[HostEvent::Progress(PROGRESS_MESSAGE.into()), HostEvent::Attached]
    );
}

#[tokio::test]
async fn provider_failure_is_reported_and_cleaned_up() {
    let mut host = DetachedHost::new();
    let err = export_pdf(&selected_scene(), &light(), &FailingProvider, &mut host).await.unwrap_err();

    assert!(matches!(err, ExportError::Snapshot(SnapshotError::Provider(_))));
    assert!(released(&host));
    assert_eq!(host.failure(), Some("Error generating PDF: snapshot: snapshot provider: surface lost"));
    assert!(!host.events().contains(&HostEvent::Progress(SUCCESS_MESSAGE.into())));
}

#[tokio::test]
async fn undecodable_snapshot_is_a_decode_error() {
    let mut host = DetachedHost::new();
    let err = export_pdf(&selected_scene(), &light(), &GarbageProvider, &mut host).await.unwrap_err();
    assert!(matches!(err, ExportError::Decode(_)));
    assert!(released(&host));
}

#[tokio::test]
async fn dark_theme_background_reaches_raster() {
    let dark = builtin_theme("dark").unwrap().tokens.resolve();
    let scene = build_scene(&DocStore::new(), &dark, &Selection::new(), &Viewport::new(20.0, 20.0));
    let mut host = DetachedHost::new();
    let doc = export_pdf(&scene, &dark, &RasterSnapshot, &mut host).await.unwrap();
    assert_eq!((doc.width, doc.height), (40, 40));
}
