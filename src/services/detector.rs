//! Layout detector client.
//!
//! Thin HTTP wrapper around the external detection service: posts the raw
//! screenshot bytes and parses its `{ "detections": [...] }` reply. Pure
//! parsing in `parse_response` for testability.

#[cfg(test)]
#[path = "detector_test.rs"]
mod detector_test;

use std::time::Duration;

use canvas::detect::DetectionResponse;

use crate::config::DetectorConfig;

const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request to the detector failed.
    #[error("detector request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The detector returned a non-success HTTP status.
    #[error("detector response error: status {status}")]
    Status { status: u16, body: String },

    /// The detector body is not a detection response.
    #[error("detector response parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

pub struct DetectorClient {
    http: reqwest::Client,
    url: String,
}

impl DetectorClient {
    /// Build a client for the configured detector endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &DetectorConfig) -> Result<Self, DetectorError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| DetectorError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, url: config.url.clone() })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send `image` to the detector.
    ///
    /// # Errors
    ///
    /// Returns a [`DetectorError`] on transport failure, a non-2xx status, or
    /// an unparsable body.
    pub async fn detect(&self, image: Vec<u8>, content_type: &str) -> Result<DetectionResponse, DetectorError> {
        let response = self
            .http
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(image)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(DetectorError::Status { status: status.as_u16(), body: text });
        }

        parse_response(&text)
    }
}

/// Parse a detector reply body.
///
/// # Errors
///
/// Returns [`DetectorError::Parse`] if `text` is not a detection response.
pub fn parse_response(text: &str) -> Result<DetectionResponse, DetectorError> {
    Ok(serde_json::from_str(text)?)
}
