mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use canvas::settings::MemorySettingsStore;

use crate::services::detector::DetectorClient;
use crate::services::settings::PgSettingsStore;
use crate::state::SharedSettings;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");

    let settings: SharedSettings = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::init_pool(url, config.db_max_connections)
                .await
                .expect("database init failed");
            Arc::new(PgSettingsStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; theme settings kept in memory");
            Arc::new(MemorySettingsStore::new())
        }
    };

    // Detection is optional: the route answers 503 without a detector.
    let detector = match config.detector.as_ref().map(DetectorClient::new) {
        Some(Ok(client)) => {
            tracing::info!(url = client.url(), "detector client initialized");
            Some(client)
        }
        Some(Err(e)) => {
            tracing::warn!(error = %e, "detector client failed; detection disabled");
            None
        }
        None => {
            tracing::warn!("DETECTOR_URL not set; detection disabled");
            None
        }
    };

    let state = state::AppState::new(settings, detector);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "wireframe listening");
    axum::serve(listener, app).await.expect("server failed");
}
