//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the theme library over whichever settings backend startup chose
//! and the optional detector client. Layouts themselves are not stored
//! server-side; every layout route receives the full component list.

use std::sync::Arc;

use canvas::settings::SettingsStore;
use canvas::theme::ThemeLibrary;

use crate::services::detector::DetectorClient;

/// Settings backend as chosen at startup (Postgres or in-memory).
pub type SharedSettings = Arc<dyn SettingsStore>;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub themes: Arc<ThemeLibrary<SharedSettings>>,
    pub detector: Option<Arc<DetectorClient>>,
}

impl AppState {
    #[must_use]
    pub fn new(settings: SharedSettings, detector: Option<DetectorClient>) -> Self {
        Self { themes: Arc::new(ThemeLibrary::new(settings)), detector: detector.map(Arc::new) }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use canvas::settings::MemorySettingsStore;

    /// Create a test `AppState` over in-memory settings, without a detector.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(Arc::new(MemorySettingsStore::new()), None)
    }
}
