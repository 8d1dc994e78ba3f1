//! Outbound ports used by the orchestrator
//!
//! Both collaborators are optional. A `DocumentStore` failure leaves the
//! claim without a document; a `Notifier` reports per-channel outcomes
//! and has no error path at all.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, PortError};

use crate::claim::ClaimRecord;
use crate::document::ClaimDocument;
use crate::notification::NotificationReport;

/// A persisted document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    /// Lookup key, usually the claim id
    pub key: String,
    /// Stored file name
    pub filename: String,
}

/// Document content loaded back from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Renders and retrieves claim documents
#[async_trait]
pub trait DocumentStore: DomainPort {
    /// Renders and persists a document
    async fn render(&self, document: &ClaimDocument) -> Result<DocumentReference, PortError>;

    /// Loads the newest document stored under `key`
    ///
    /// # Errors
    ///
    /// Returns `PortError::NotFound` when nothing is stored under the key.
    async fn load(&self, key: &str) -> Result<StoredDocument, PortError>;
}

/// Delivers claim notifications
#[async_trait]
pub trait Notifier: DomainPort {
    /// Channel names this notifier reports on
    fn channels(&self) -> Vec<String>;

    /// Notifies about a processed claim
    ///
    /// Never fails: every channel appears in the returned report.
    async fn notify(&self, claim: &ClaimRecord, contact: Option<&str>) -> NotificationReport;
}
