//! HTTP vision model classifier
//!
//! Sends the stored image bytes to a model endpoint and expects a JSON
//! assessment back:
//!
//! ```json
//! { "damage_type": "Hail", "severity": "moderate", "estimated_cost": 2400.0, "confidence": 0.91 }
//! ```
//!
//! Transport failures map to `PortError::Connection`/`Timeout`, non-2xx
//! replies to `ServiceUnavailable`, and malformed bodies to
//! `Transformation`.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use core_kernel::{DomainPort, Money, PortError};
use domain_claims::{Classifier, ClassifierKind, DamageAssessment, ImageReference, Severity};

#[derive(Debug, Deserialize)]
struct ModelReply {
    damage_type: String,
    severity: Severity,
    estimated_cost: Decimal,
    confidence: f64,
}

/// Classifier backed by an external vision model
#[derive(Debug, Clone)]
pub struct HttpVisionClassifier {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpVisionClassifier {
    /// # Errors
    ///
    /// Returns `PortError::Validation` for an empty endpoint and
    /// `PortError::Internal` when the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PortError> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(PortError::validation_field("vision model URL is required", "vision_model_url"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_transport_error(&self, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::timeout("vision model request", self.timeout)
        } else {
            PortError::Connection {
                message: format!("vision model request failed: {}", error),
                source: Some(Box::new(error)),
            }
        }
    }
}

impl DomainPort for HttpVisionClassifier {}

#[async_trait]
impl Classifier for HttpVisionClassifier {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::RealModel
    }

    async fn classify(&self, image: &ImageReference) -> Result<DamageAssessment, PortError> {
        let path = image
            .path
            .as_ref()
            .ok_or_else(|| PortError::validation_field("image content was not stored", "image"))?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PortError::io(format!("reading image {}", path.display()), e))?;

        debug!(endpoint = %self.endpoint, image = %image.name, size = bytes.len(), "Calling vision model");

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .header("X-Image-Name", image.name.as_str())
            .body(bytes)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(PortError::ServiceUnavailable {
                service: format!("vision model returned {}", response.status()),
            });
        }

        let reply: ModelReply = response
            .json()
            .await
            .map_err(|e| PortError::transformation(format!("invalid vision model reply: {}", e)))?;

        DamageAssessment::new(
            reply.damage_type,
            reply.severity,
            Money::usd(reply.estimated_cost),
            reply.confidence,
        )
        .map_err(|e| PortError::transformation(e.to_string()))
    }
}
