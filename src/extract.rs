use crate::event::RawEvent;
use log::{debug, info};
use reqwest::{Client, StatusCode};
use serde_json::json;

/// Failures at the extraction-service boundary.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("could not reach extraction service: {0}")]
    Request(#[from] reqwest::Error),
    #[error("extraction service returned {status}: {body}")]
    Service { status: StatusCode, body: String },
    #[error("extraction service response is not a JSON event array: {0}")]
    Malformed(String),
}

/// Client for the local event-extraction service.
pub struct ExtractorClient {
    client: Client,
    endpoint: String,
}

impl ExtractorClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { client: Client::new(), endpoint: endpoint.into() }
    }

    /// Sends the flattened page text and returns the event records the
    /// service recognized. One request per call: no retry, no timeout; a
    /// failure is terminal for this scan.
    pub async fn extract_events(&self, page_text: &str) -> Result<Vec<RawEvent>, ExtractError> {
        debug!(
            "Requesting event extraction from {} ({} chars of page text)",
            self.endpoint,
            page_text.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "html": page_text }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ExtractError::Service { status, body });
        }

        debug!("Extraction service response: {}", body);
        let events: Vec<RawEvent> =
            serde_json::from_str(&body).map_err(|e| ExtractError::Malformed(e.to_string()))?;
        info!("Extraction service recognized {} event(s)", events.len());
        Ok(events)
    }
}
