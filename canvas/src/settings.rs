//! Settings service contract: a process-wide durable key-value store.
//!
//! Theme state (the active key and the saved snapshots) is read and written
//! through [`SettingsStore`] rather than ambient globals. The server backs it
//! with Postgres; tests and storage-less deployments use
//! [`MemorySettingsStore`]. Writes are last-writer-wins with no versioning.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Error returned by a settings backend.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings backend: {0}")]
    Backend(String),
    #[error("settings payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Async key-value store for settings. Enables injection and mocking.
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the backend cannot be reached.
    async fn load(&self, key: &str) -> Result<Option<String>, SettingsError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the backend rejects the write.
    async fn save(&self, key: &str, value: &str) -> Result<(), SettingsError>;
}

#[async_trait::async_trait]
impl<T: SettingsStore + ?Sized> SettingsStore for Arc<T> {
    async fn load(&self, key: &str) -> Result<Option<String>, SettingsError> {
        (**self).load(key).await
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        (**self).save(key, value).await
    }
}

/// In-process settings store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let values = self.values.read().map_err(|e| SettingsError::Backend(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut values = self.values.write().map_err(|e| SettingsError::Backend(e.to_string()))?;
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
