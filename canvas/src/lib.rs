//! Layout editor core for the wireframe builder.
//!
//! This crate turns detector output into an editable component model and
//! projects that model back out as generated JSX and as a PDF snapshot. It
//! owns the full lifecycle of the canvas: normalizing detections, mapping
//! between the 640-unit canonical space and the rendered viewport, applying
//! drag/resize/drop gestures, and resolving themes. Hosts wire their pointer
//! events and persistence to the engine and act on the returned
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Interaction engine, [`engine::EngineCore`] |
//! | [`detect`] | Detector response normalization |
//! | [`doc`] | Component model, document store and id allocation |
//! | [`camera`] | Canonical ↔ viewport coordinate conversions |
//! | [`input`] | Gesture state machine and resize geometry |
//! | [`hit`] | Hit-testing, selection and pointer dispatch |
//! | [`theme`] | Theme tokens, built-ins, resolver and saved-theme library |
//! | [`settings`] | Persistent settings contract |
//! | [`codegen`] | JSX source generation |
//! | [`render`] | Scene tree and raster snapshots |
//! | [`export`] | Snapshot → PDF export pipeline |
//! | [`pdf`] | Single-page PDF writer |
//! | [`consts`] | Shared constants (canvas size, placeholders, page size) |

pub mod camera;
pub mod codegen;
pub mod consts;
pub mod detect;
pub mod doc;
pub mod engine;
pub mod export;
pub mod hit;
pub mod input;
pub mod pdf;
pub mod render;
pub mod settings;
pub mod theme;
