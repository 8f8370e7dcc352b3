//! Snapshot export pipeline: scene tree → PNG → single-page PDF.
//!
//! DESIGN
//! ======
//! The pipeline never touches the visible tree. It works on a clone that is
//! attached off-screen through the [`ExportHost`] for the duration of the
//! export, with editor affordances stripped and third-party icon sources
//! swapped for an embedded image. Rasterization goes through the injected
//! [`SnapshotProvider`], so the whole pipeline runs without a real surface.
//!
//! ERROR HANDLING
//! ==============
//! Every failure surfaces as one [`ExportError`] and one host-visible
//! message. The off-screen clone and progress indicator are released by a
//! guard on every exit path.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use tracing::{error, info};

use crate::consts::{EXPORT_SCALE, ICON_DATA_URI, ICON_HOST_MARKERS};
use crate::pdf::{self, PageSize, PdfError};
use crate::render::{CaptureRequest, SceneNode, SnapshotError, SnapshotProvider};
use crate::theme::ResolvedTheme;

/// Download name of the exported document.
pub const PDF_FILE_NAME: &str = "wireframe.pdf";
/// Indicator text while an export is running.
pub const PROGRESS_MESSAGE: &str = "Generating PDF... Please wait.";
/// Indicator text once the document is ready.
pub const SUCCESS_MESSAGE: &str = "PDF generated successfully!";

const STRIPPED_CLASS_WORDS: [&str; 3] = ["border", "outline", "shadow"];

/// Error returned by [`export_pdf`].
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("decode snapshot: {0}")]
    Decode(#[from] image::ImageError),
    #[error("pdf: {0}")]
    Pdf(#[from] PdfError),
}

/// Host-side effects of an export: the off-screen clone and user feedback.
pub trait ExportHost: Send {
    fn attach_offscreen(&mut self, node: &SceneNode);
    fn detach_offscreen(&mut self);
    fn show_progress(&mut self, message: &str);
    fn hide_progress(&mut self);
    fn report_failure(&mut self, message: &str);
}

/// Observable host event, recorded by [`DetachedHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Attached,
    Detached,
    Progress(String),
    ProgressHidden,
    Failure(String),
}

/// Host without a surface; records what the pipeline asked of it.
#[derive(Debug, Default)]
pub struct DetachedHost {
    events: Vec<HostEvent>,
    offscreen: Option<SceneNode>,
}

impl DetachedHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// The clone currently attached, if any.
    #[must_use]
    pub fn offscreen(&self) -> Option<&SceneNode> {
        self.offscreen.as_ref()
    }

    /// Last failure message reported, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            HostEvent::Failure(msg) => Some(msg.as_str()),
            _ => None,
        })
    }
}

impl ExportHost for DetachedHost {
    fn attach_offscreen(&mut self, node: &SceneNode) {
        self.offscreen = Some(node.clone());
        self.events.push(HostEvent::Attached);
    }

    fn detach_offscreen(&mut self) {
        self.offscreen = None;
        self.events.push(HostEvent::Detached);
    }

    fn show_progress(&mut self, message: &str) {
        self.events.push(HostEvent::Progress(message.to_owned()));
    }

    fn hide_progress(&mut self) {
        self.events.push(HostEvent::ProgressHidden);
    }

    fn report_failure(&mut self, message: &str) {
        self.events.push(HostEvent::Failure(message.to_owned()));
    }
}

/// Holds the off-screen clone and indicator; releases both on drop.
struct Staged<'a> {
    host: &'a mut dyn ExportHost,
}

impl<'a> Staged<'a> {
    fn acquire(host: &'a mut dyn ExportHost, clone: &SceneNode) -> Self {
        host.show_progress(PROGRESS_MESSAGE);
        host.attach_offscreen(clone);
        Self { host }
    }
}

impl Drop for Staged<'_> {
    fn drop(&mut self) {
        self.host.detach_offscreen();
        self.host.hide_progress();
    }
}

/// Finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedPdf {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Raster size in pixels.
    pub width: u32,
    pub height: u32,
}

// =============================================================================
// Pipeline
// =============================================================================

/// Export `scene` as a single-page A4 document.
///
/// # Errors
///
/// Returns [`ExportError`] if rasterization, decoding, or document assembly
/// fails. The failure is also reported to `host`.
pub async fn export_pdf(
    scene: &SceneNode,
    theme: &ResolvedTheme,
    provider: &dyn SnapshotProvider,
    host: &mut dyn ExportHost,
) -> Result<ExportedPdf, ExportError> {
    let clone = prepare_export_tree(scene);
    let result = {
        let mut staged = Staged::acquire(host, &clone);
        let out = render_document(&clone, theme, provider).await;
        if out.is_ok() {
            staged.host.show_progress(SUCCESS_MESSAGE);
        }
        out
    };

    match result {
        Ok(doc) => {
            info!(bytes = doc.bytes.len(), width = doc.width, height = doc.height, "pdf exported");
            Ok(doc)
        }
        Err(e) => {
            error!(error = %e, "pdf export failed");
            host.report_failure(&format!("Error generating PDF: {e}"));
            Err(e)
        }
    }
}

async fn render_document(
    clone: &SceneNode,
    theme: &ResolvedTheme,
    provider: &dyn SnapshotProvider,
) -> Result<ExportedPdf, ExportError> {
    let request = CaptureRequest { node: clone, scale: EXPORT_SCALE, background: &theme.canvas_background };
    let png = provider.capture(request).await?;
    let rgb = image::load_from_memory(&png)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    let bytes = pdf::image_document(width, height, rgb.as_raw(), PageSize::A4)?;
    Ok(ExportedPdf { file_name: PDF_FILE_NAME.to_owned(), bytes, width, height })
}

// =============================================================================
// Clone preparation
// =============================================================================

/// Clone `scene` with editor affordances removed and icons embedded.
#[must_use]
pub fn prepare_export_tree(scene: &SceneNode) -> SceneNode {
    let mut clone = scene.clone();
    clone.for_each_descendant_mut(&mut |node| {
        neutralize(node);
        substitute_icon(node);
    });
    clone
}

/// Strip border, outline and shadow from one node's classes and style.
pub fn neutralize(node: &mut SceneNode) {
    node.classes.retain(|class| !is_affordance_class(class));
    node.style.border = None;
    node.style.border_width = 0.0;
    node.style.outline = None;
    node.style.outline_width = 0.0;
    node.style.shadow = None;
}

fn is_affordance_class(class: &str) -> bool {
    STRIPPED_CLASS_WORDS.iter().any(|word| {
        class.match_indices(word).any(|(at, _)| {
            class[..at].chars().next_back().is_none_or(|c| !c.is_alphanumeric() && c != '_')
        })
    })
}

fn substitute_icon(node: &mut SceneNode) {
    let external = node.img_src.as_deref().is_some_and(|src| ICON_HOST_MARKERS.iter().any(|m| src.contains(m)));
    if external {
        node.img_src = Some(ICON_DATA_URI.to_owned());
    }
}
