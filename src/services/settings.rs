//! Postgres-backed settings store.
//!
//! Each key is one row of the `settings` table. Writes upsert, so the last
//! writer wins across processes.

use canvas::settings::{SettingsError, SettingsStore};
use sqlx::PgPool;

pub struct PgSettingsStore {
    pool: PgPool,
}

impl PgSettingsStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SettingsStore for PgSettingsStore {
    async fn load(&self, key: &str) -> Result<Option<String>, SettingsError> {
        sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        sqlx::query(
            "INSERT INTO settings (key, value, updated_at) VALUES ($1, $2, now()) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;
        Ok(())
    }
}

fn database_error(err: sqlx::Error) -> SettingsError {
    SettingsError::Backend(format!("database error: {err}"))
}
