//! Detection normalizer: raw detector boxes to canonical components.
//!
//! The detector emits center-form boxes with free-form labels. This module is
//! the only place that converts them: every retained box is rewritten to
//! corner form, pure layout containers are dropped, text boxes that sit inside
//! a nav are dropped (the nav renders its own captions), and every survivor is
//! given a unique id.

#[cfg(test)]
#[path = "detect_test.rs"]
mod detect_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::doc::{CanvasBox, Component, ComponentId, ComponentKind, IdAllocator};

/// Labels that only anchor other elements and never render.
pub const CONTAINER_LABELS: [&str; 1] = ["container"];

/// Id prefix for components created from detections.
pub const DETECTION_ID_PREFIX: &str = "detection";

/// One detector box, exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    /// Free-form class label.
    pub label: String,
    /// Center-form `[cx, cy, w, h]` in detector units.
    #[serde(rename = "box")]
    pub bbox: [f64; 4],
    /// Recognized text, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Pre-assigned id, if the producer supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl RawDetection {
    /// The detection's box converted to corner form.
    #[must_use]
    pub fn corner_box(&self) -> CanvasBox {
        let [cx, cy, w, h] = self.bbox;
        CanvasBox::from_center(cx, cy, w, h)
    }

    fn normalized_label(&self) -> String {
        self.label.trim().to_ascii_lowercase()
    }
}

/// Detector response body. A missing or `null` `detections` array is an empty layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    #[serde(default)]
    pub detections: Option<Vec<RawDetection>>,
}

impl DetectionResponse {
    /// The detections, or an empty slice when absent.
    #[must_use]
    pub fn detections(&self) -> &[RawDetection] {
        self.detections.as_deref().unwrap_or_default()
    }
}

/// Whether `label` names a pure layout container.
#[must_use]
pub fn is_container_label(label: &str) -> bool {
    let label = label.trim().to_ascii_lowercase();
    CONTAINER_LABELS.contains(&label.as_str())
}

/// Whether `inner` lies inside one of `navs` without being identical to it.
fn inside_any_nav(inner: &CanvasBox, navs: &[CanvasBox]) -> bool {
    navs.iter().any(|nav| nav != inner && nav.contains(inner))
}

/// Normalize a detector response into components, ready for the document.
pub fn normalize_response(response: &DetectionResponse, ids: &mut dyn IdAllocator) -> Vec<Component> {
    normalize(response.detections(), ids)
}

/// Normalize raw detections into corner-form, de-duplicated components.
///
/// Output order follows input order. Ids supplied by the producer are kept
/// unless they repeat; everything else receives `detection-{n}`.
pub fn normalize(detections: &[RawDetection], ids: &mut dyn IdAllocator) -> Vec<Component> {
    let navs: Vec<CanvasBox> = detections
        .iter()
        .filter(|d| d.normalized_label() == "nav")
        .map(RawDetection::corner_box)
        .collect();

    let mut taken: HashSet<String> = detections.iter().filter_map(|d| d.id.clone()).collect();
    let mut assigned: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(detections.len());

    for detection in detections {
        let label = detection.normalized_label();
        if is_container_label(&label) {
            debug!(label = %detection.label, "dropping layout container detection");
            continue;
        }

        let bbox = detection.corner_box();
        if label == "text" && inside_any_nav(&bbox, &navs) {
            debug!(?bbox, "dropping text detection inside nav");
            continue;
        }

        let id = match detection.id.as_deref() {
            Some(raw) if !assigned.contains(raw) => ComponentId::new(raw),
            _ => loop {
                let candidate = ids.next_id(DETECTION_ID_PREFIX);
                if !taken.contains(candidate.as_str()) {
                    break candidate;
                }
            },
        };
        assigned.insert(id.as_str().to_owned());
        taken.insert(id.as_str().to_owned());

        let kind = ComponentKind::from_label(&label);
        let mut component = Component::new(id, kind, bbox);
        component.text = detection.text.clone();
        if kind == ComponentKind::Unknown {
            component.label = Some(detection.label.clone());
        }
        out.push(component);
    }

    debug!(input = detections.len(), output = out.len(), "normalized detections");
    out
}
