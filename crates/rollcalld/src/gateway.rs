//! Recognition gateway client.
//!
//! The model is an external collaborator: it receives a base64-encoded
//! image and answers with a predicted name and a confidence in [0, 1].
//! Everything past that contract (which model, where it runs) is the
//! gateway's business, not ours.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// The gateway errored or returned a malformed result.
    #[error("recognition failed: {0}")]
    Failed(String),
    /// The gateway did not answer within the configured timeout.
    #[error("recognition timed out after {0:?}")]
    Timeout(Duration),
}

/// What the model said about one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    pub prediction: String,
    pub confidence: f32,
}

impl Recognition {
    /// Reject out-of-contract results at the boundary: confidence must be
    /// a real number in [0, 1].
    pub fn validated(self) -> Result<Self, GatewayError> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(GatewayError::Failed(format!(
                "confidence out of range: {}",
                self.confidence
            )));
        }
        Ok(self)
    }
}

/// Strategy for classifying an image payload. Production talks HTTP; tests
/// substitute a canned implementation.
pub trait RecognitionGateway {
    fn classify(
        &self,
        image_b64: &str,
    ) -> impl std::future::Future<Output = Result<Recognition, GatewayError>> + Send;
}

/// HTTP request body sent to the inference endpoint.
#[derive(Serialize)]
struct ClassifyRequest<'a> {
    image_base64: &'a str,
}

/// Gateway reached over HTTP, e.g. a hosted inference space.
pub struct HttpGateway {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpGateway {
    /// Build a client with explicit total and connect timeouts so a stuck
    /// model cannot hang an ingestion call.
    pub fn new(url: String, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| GatewayError::Failed(format!("building HTTP client: {e}")))?;
        Ok(Self { client, url, timeout })
    }
}

impl RecognitionGateway for HttpGateway {
    async fn classify(&self, image_b64: &str) -> Result<Recognition, GatewayError> {
        tracing::debug!(url = %self.url, payload_len = image_b64.len(), "classify request");

        let response = self
            .client
            .post(&self.url)
            .json(&ClassifyRequest { image_base64: image_b64 })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout(self.timeout)
                } else {
                    GatewayError::Failed(format!("gateway request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(GatewayError::Failed(format!(
                "gateway returned status {}",
                response.status()
            )));
        }

        let recognition: Recognition = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout(self.timeout)
            } else {
                GatewayError::Failed(format!("malformed gateway response: {e}"))
            }
        })?;

        recognition.validated()
    }
}
