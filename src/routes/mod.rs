//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API for the wireframe editor under a single
//! Axum router: layout normalization and detection, JSX and PDF downloads,
//! and theme settings.

pub mod layout;
pub mod themes;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/layout/normalize", post(layout::normalize))
        .route("/api/layout/detect", post(layout::detect))
        .route("/api/layout/codegen", post(layout::codegen))
        .route("/api/layout/export.pdf", post(layout::export_pdf))
        .route("/api/themes", get(themes::list_themes))
        .route("/api/themes/active", get(themes::resolved_active).put(themes::set_active))
        .route("/api/themes/saved", post(themes::save_theme))
        .route("/api/themes/saved/{name}", delete(themes::delete_theme))
        .route("/api/themes/reset", post(themes::reset_themes))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
