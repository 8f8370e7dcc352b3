//! Themes: token sets, the pure resolver, and the persisted theme library.
//!
//! DESIGN
//! ======
//! A theme is data. [`ThemeTokens`] is deliberately all-optional so a
//! half-filled custom theme round-trips through storage unchanged;
//! [`ThemeTokens::resolve`] turns it into a [`ResolvedTheme`] where every
//! value is concrete. Resolution for any rendered property follows one chain:
//!
//! ```text
//! component override -> theme per-kind token -> theme base token -> constant
//! ```
//!
//! ERROR HANDLING
//! ==============
//! Resolution never fails. Corrupt persisted theme data is logged and
//! treated as absent; only backend failures surface as errors.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::doc::{Component, ComponentKind};
use crate::settings::{SettingsError, SettingsStore};

/// Settings key holding the active theme key.
pub const ACTIVE_THEME_SETTING: &str = "wireframe.active_theme";
/// Settings key holding the JSON array of saved themes.
pub const SAVED_THEMES_SETTING: &str = "wireframe.saved_themes";
/// Key of the theme used when nothing else applies.
pub const DEFAULT_THEME_KEY: &str = "light";

const FALLBACK_BACKGROUND: &str = "#ffffff";
const FALLBACK_TEXT: &str = "#000000";
const FALLBACK_BORDER: &str = "#d1d5db";
const FALLBACK_PRIMARY: &str = "#3b82f6";
const FALLBACK_NEUTRAL: &str = "#1f2937";
const FALLBACK_ON_SURFACE: &str = "#ffffff";
const FALLBACK_FONT: &str = "Inter, sans-serif";
const FALLBACK_FONT_SIZE: f64 = 16.0;
const FALLBACK_RADIUS: f64 = 4.0;
const FALLBACK_PADDING: f64 = 16.0;
const FALLBACK_SHADOW: &str = "0 1px 3px rgba(0,0,0,0.1)";
const HEADING_SCALE: f64 = 1.5;

// =============================================================
// Tokens
// =============================================================

/// Per-kind overrides inside a theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentTokens {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

/// A theme's raw token set. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeTokens {
    /// Canvas background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Base text color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Canvas border color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    /// Accent used by buttons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    /// Surface used by navs and footers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neutral: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<ComponentKind, ComponentTokens>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_padding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<String>,
}

/// Fully resolved style for one component kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindStyle {
    /// Surface fill; `None` for kinds drawn without a surface.
    pub background: Option<String>,
    pub color: String,
    pub border_radius: f64,
    pub font_size: f64,
}

/// A theme with every token concrete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTheme {
    pub canvas_background: String,
    pub text: String,
    pub border: String,
    pub heading_font: String,
    pub body_font: String,
    pub base_font_size: f64,
    pub border_radius: f64,
    pub container_padding: f64,
    pub shadow: String,
    pub kinds: BTreeMap<ComponentKind, KindStyle>,
}

impl ThemeTokens {
    /// Resolve every token. Pure and total.
    #[must_use]
    pub fn resolve(&self) -> ResolvedTheme {
        let text = or_fallback(self.text.as_ref(), FALLBACK_TEXT);
        let base_font_size = self.base_font_size.unwrap_or(FALLBACK_FONT_SIZE);
        let border_radius = self.border_radius.unwrap_or(FALLBACK_RADIUS);

        let kinds = ComponentKind::ALL
            .into_iter()
            .map(|kind| {
                let own = self.components.get(&kind);
                let background = own.and_then(|t| t.background.clone()).or_else(|| self.surface_for(kind));
                let color = own.and_then(|t| t.text_color.clone()).unwrap_or_else(|| {
                    if matches!(kind, ComponentKind::Button | ComponentKind::Nav | ComponentKind::Footer) {
                        FALLBACK_ON_SURFACE.to_owned()
                    } else {
                        text.clone()
                    }
                });
                let font_size = own.and_then(|t| t.font_size).unwrap_or(if kind == ComponentKind::Heading {
                    base_font_size * HEADING_SCALE
                } else {
                    base_font_size
                });
                let style = KindStyle {
                    background,
                    color,
                    border_radius: own.and_then(|t| t.border_radius).unwrap_or(border_radius),
                    font_size,
                };
                (kind, style)
            })
            .collect();

        ResolvedTheme {
            canvas_background: or_fallback(self.background.as_ref(), FALLBACK_BACKGROUND),
            text,
            border: or_fallback(self.border.as_ref(), FALLBACK_BORDER),
            heading_font: or_fallback(self.heading_font.as_ref(), FALLBACK_FONT),
            body_font: or_fallback(self.body_font.as_ref(), FALLBACK_FONT),
            base_font_size,
            border_radius,
            container_padding: self.container_padding.unwrap_or(FALLBACK_PADDING),
            shadow: or_fallback(self.shadow.as_ref(), FALLBACK_SHADOW),
            kinds,
        }
    }

    /// Base-token surface for kinds that paint one.
    fn surface_for(&self, kind: ComponentKind) -> Option<String> {
        match kind {
            ComponentKind::Button => Some(or_fallback(self.primary.as_ref(), FALLBACK_PRIMARY)),
            ComponentKind::Nav | ComponentKind::Footer => Some(or_fallback(self.neutral.as_ref(), FALLBACK_NEUTRAL)),
            ComponentKind::Input => Some(or_fallback(self.background.as_ref(), FALLBACK_BACKGROUND)),
            _ => None,
        }
    }
}

fn or_fallback(token: Option<&String>, fallback: &str) -> String {
    token.map_or_else(|| fallback.to_owned(), Clone::clone)
}

impl ResolvedTheme {
    /// Style for `kind` from the theme alone.
    #[must_use]
    pub fn kind_style(&self, kind: ComponentKind) -> KindStyle {
        self.kinds.get(&kind).cloned().unwrap_or_else(|| KindStyle {
            background: None,
            color: self.text.clone(),
            border_radius: self.border_radius,
            font_size: self.base_font_size,
        })
    }

    /// Style for `component`, with its own `bg_color` / `color` taking precedence.
    #[must_use]
    pub fn style_for(&self, component: &Component) -> KindStyle {
        let mut style = self.kind_style(component.kind);
        if let Some(bg) = component.bg_color.as_ref().filter(|s| !s.is_empty()) {
            style.background = Some(bg.clone());
        }
        if let Some(color) = component.color.as_ref().filter(|s| !s.is_empty()) {
            style.color.clone_from(color);
        }
        style
    }
}

// =============================================================
// Built-in themes
// =============================================================

/// A named theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub key: String,
    pub name: String,
    pub tokens: ThemeTokens,
}

struct Palette {
    key: &'static str,
    name: &'static str,
    background: &'static str,
    text: &'static str,
    border: &'static str,
    input: (&'static str, &'static str),
    button: (&'static str, &'static str),
    bar: (&'static str, &'static str),
    heading: &'static str,
    body: &'static str,
}

const PALETTES: [Palette; 5] = [
    Palette {
        key: "light",
        name: "Light",
        background: "#ffffff",
        text: "#000000",
        border: "#d1d5db",
        input: ("#ffffff", "#000000"),
        button: ("#22c55e", "#ffffff"),
        bar: ("#1f2937", "#ffffff"),
        heading: "#111827",
        body: "#374151",
    },
    Palette {
        key: "dark",
        name: "Dark",
        background: "#1f2937",
        text: "#ffffff",
        border: "#374151",
        input: ("#374151", "#ffffff"),
        button: ("#2563eb", "#ffffff"),
        bar: ("#111827", "#ffffff"),
        heading: "#ffffff",
        body: "#d1d5db",
    },
    Palette {
        key: "blue",
        name: "Blue",
        background: "#ffffff",
        text: "#1e3a8a",
        border: "#93c5fd",
        input: ("#eff6ff", "#1e3a8a"),
        button: ("#3b82f6", "#ffffff"),
        bar: ("#1e40af", "#ffffff"),
        heading: "#1e40af",
        body: "#1d4ed8",
    },
    Palette {
        key: "green",
        name: "Green",
        background: "#ffffff",
        text: "#14532d",
        border: "#86efac",
        input: ("#f0fdf4", "#14532d"),
        button: ("#16a34a", "#ffffff"),
        bar: ("#166534", "#ffffff"),
        heading: "#166534",
        body: "#15803d",
    },
    Palette {
        key: "contrast",
        name: "High Contrast",
        background: "#000000",
        text: "#ffffff",
        border: "#facc15",
        input: ("#000000", "#ffffff"),
        button: ("#eab308", "#000000"),
        bar: ("#eab308", "#000000"),
        heading: "#facc15",
        body: "#ffffff",
    },
];

impl Palette {
    fn theme(&self) -> Theme {
        let surface = |(background, text): (&str, &str)| ComponentTokens {
            background: Some(background.to_owned()),
            text_color: Some(text.to_owned()),
            ..ComponentTokens::default()
        };
        let ink = |text: &str| ComponentTokens { text_color: Some(text.to_owned()), ..ComponentTokens::default() };

        let mut components = BTreeMap::new();
        components.insert(ComponentKind::Input, surface(self.input));
        components.insert(ComponentKind::Button, surface(self.button));
        components.insert(ComponentKind::Nav, surface(self.bar));
        components.insert(ComponentKind::Footer, surface(self.bar));
        components.insert(ComponentKind::Heading, ink(self.heading));
        components.insert(ComponentKind::Text, ink(self.body));

        Theme {
            key: self.key.to_owned(),
            name: self.name.to_owned(),
            tokens: ThemeTokens {
                background: Some(self.background.to_owned()),
                text: Some(self.text.to_owned()),
                border: Some(self.border.to_owned()),
                primary: Some(self.button.0.to_owned()),
                neutral: Some(self.bar.0.to_owned()),
                components,
                ..ThemeTokens::default()
            },
        }
    }
}

/// Every built-in theme, default first.
#[must_use]
pub fn builtin_themes() -> Vec<Theme> {
    PALETTES.iter().map(Palette::theme).collect()
}

/// The built-in theme named `key`, if any.
#[must_use]
pub fn builtin_theme(key: &str) -> Option<Theme> {
    PALETTES.iter().find(|p| p.key == key).map(Palette::theme)
}

/// The hard-coded default theme.
#[must_use]
pub fn default_theme() -> Theme {
    PALETTES[0].theme()
}

/// A user-named snapshot of a full token set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTheme {
    pub name: String,
    pub tokens: ThemeTokens,
}

/// Resolve `key` against the built-ins, then `saved`, then the default.
#[must_use]
pub fn resolve_theme(key: &str, saved: &[SavedTheme]) -> ResolvedTheme {
    if let Some(theme) = builtin_theme(key) {
        return theme.tokens.resolve();
    }
    match saved.iter().find(|t| t.name == key) {
        Some(theme) => theme.tokens.resolve(),
        None => default_theme().tokens.resolve(),
    }
}

// =============================================================
// Library
// =============================================================

/// Error returned by theme library mutations.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("unknown theme: {0}")]
    Unknown(String),
    #[error("invalid theme name: {0:?}")]
    InvalidName(String),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Built-in and saved themes plus the active selection, over a settings store.
pub struct ThemeLibrary<S> {
    store: S,
}

impl<S: SettingsStore> ThemeLibrary<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn builtins(&self) -> Vec<Theme> {
        builtin_themes()
    }

    /// The persisted active key, or the default key when unset.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the store cannot be read.
    pub async fn active_key(&self) -> Result<String, SettingsError> {
        Ok(self
            .store
            .load(ACTIVE_THEME_SETTING)
            .await?
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| DEFAULT_THEME_KEY.to_owned()))
    }

    /// Make `key` (a built-in key or saved name) the active theme.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Unknown`] if `key` names no theme.
    pub async fn set_active(&self, key: &str) -> Result<(), ThemeError> {
        let key = key.trim();
        let known = builtin_theme(key).is_some() || self.saved().await?.iter().any(|t| t.name == key);
        if !known {
            return Err(ThemeError::Unknown(key.to_owned()));
        }
        self.store.save(ACTIVE_THEME_SETTING, key).await?;
        Ok(())
    }

    /// Resolve the active theme. An active key naming a since-deleted theme
    /// resolves to the default.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the store cannot be read.
    pub async fn resolve_active(&self) -> Result<ResolvedTheme, SettingsError> {
        let key = self.active_key().await?;
        let saved = self.saved().await?;
        Ok(resolve_theme(&key, &saved))
    }

    /// Saved themes in save order. Corrupt data reads as empty.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the store cannot be read.
    pub async fn saved(&self) -> Result<Vec<SavedTheme>, SettingsError> {
        let Some(raw) = self.store.load(SAVED_THEMES_SETTING).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(themes) => Ok(themes),
            Err(e) => {
                warn!(error = %e, "saved themes are corrupt; ignoring");
                Ok(Vec::new())
            }
        }
    }

    /// Save `tokens` under `name`, replacing a saved theme of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::InvalidName`] for blank names and names taken by
    /// a built-in theme.
    pub async fn save(&self, name: &str, tokens: ThemeTokens) -> Result<(), ThemeError> {
        let name = name.trim();
        if name.is_empty() || builtin_theme(name).is_some() {
            return Err(ThemeError::InvalidName(name.to_owned()));
        }

        let mut saved = self.saved().await?;
        match saved.iter_mut().find(|t| t.name == name) {
            Some(existing) => existing.tokens = tokens,
            None => saved.push(SavedTheme { name: name.to_owned(), tokens }),
        }
        self.write_saved(&saved).await?;
        Ok(())
    }

    /// Delete the saved theme `name`, trimmed as on save. Returns whether one was removed.
    /// Deleting the active theme makes the default active.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the store cannot be read or written.
    pub async fn delete(&self, name: &str) -> Result<bool, SettingsError> {
        let name = name.trim();
        let mut saved = self.saved().await?;
        let before = saved.len();
        saved.retain(|t| t.name != name);
        if saved.len() == before {
            return Ok(false);
        }
        self.write_saved(&saved).await?;
        if self.active_key().await? == name {
            self.store.save(ACTIVE_THEME_SETTING, DEFAULT_THEME_KEY).await?;
        }
        Ok(true)
    }

    /// Make the hard-coded default theme active again. Saved themes are kept.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the store cannot be written.
    pub async fn reset(&self) -> Result<(), SettingsError> {
        self.store.save(ACTIVE_THEME_SETTING, DEFAULT_THEME_KEY).await
    }

    async fn write_saved(&self, saved: &[SavedTheme]) -> Result<(), SettingsError> {
        let raw = serde_json::to_string(saved)?;
        self.store.save(SAVED_THEMES_SETTING, &raw).await
    }
}
