//! Theme settings routes.

#[cfg(test)]
#[path = "themes_test.rs"]
mod themes_test;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use canvas::settings::SettingsError;
use canvas::theme::{ResolvedTheme, SavedTheme, Theme, ThemeError};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::state::AppState;

#[derive(Serialize)]
pub struct ThemesResponse {
    pub active: String,
    pub builtins: Vec<Theme>,
    pub saved: Vec<SavedTheme>,
}

#[derive(Deserialize)]
pub struct SetActiveBody {
    pub key: String,
}

/// `GET /api/themes` — active key, built-in themes and saved themes.
pub async fn list_themes(State(state): State<AppState>) -> Result<Json<ThemesResponse>, StatusCode> {
    let active = state.themes.active_key().await.map_err(settings_error_to_status)?;
    let saved = state.themes.saved().await.map_err(settings_error_to_status)?;
    Ok(Json(ThemesResponse { active, builtins: state.themes.builtins(), saved }))
}

/// `GET /api/themes/active` — the active theme with every token resolved.
pub async fn resolved_active(State(state): State<AppState>) -> Result<Json<ResolvedTheme>, StatusCode> {
    let theme = state.themes.resolve_active().await.map_err(settings_error_to_status)?;
    Ok(Json(theme))
}

/// `PUT /api/themes/active` — switch the active theme.
pub async fn set_active(
    State(state): State<AppState>,
    Json(body): Json<SetActiveBody>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    state.themes.set_active(&body.key).await.map_err(theme_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true, "active": body.key })))
}

/// `POST /api/themes/saved` — save (or replace) a named custom theme.
pub async fn save_theme(
    State(state): State<AppState>,
    Json(body): Json<SavedTheme>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    state.themes.save(&body.name, body.tokens).await.map_err(theme_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `DELETE /api/themes/saved/:name` — delete a saved theme.
pub async fn delete_theme(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let removed = state.themes.delete(&name).await.map_err(settings_error_to_status)?;
    if !removed {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `POST /api/themes/reset` — make the default theme active.
pub async fn reset_themes(State(state): State<AppState>) -> Result<Json<serde_json::Value>, StatusCode> {
    state.themes.reset().await.map_err(settings_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

pub(crate) fn settings_error_to_status(err: SettingsError) -> StatusCode {
    error!(error = %err, "settings store failed");
    match err {
        SettingsError::Backend(_) => StatusCode::SERVICE_UNAVAILABLE,
        SettingsError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn theme_error_to_status(err: ThemeError) -> StatusCode {
    match err {
        ThemeError::Unknown(_) => StatusCode::NOT_FOUND,
        ThemeError::InvalidName(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ThemeError::Settings(e) => settings_error_to_status(e),
    }
}
