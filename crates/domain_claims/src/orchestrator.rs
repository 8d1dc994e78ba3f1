//! Claim orchestration
//!
//! Runs classify → policy lookup → payout strictly in order, assembles
//! the claim record, then hands it to the optional document store and
//! notifier. Everything up to assembly is all-or-nothing.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use validator::ValidateEmail;

use core_kernel::ClaimId;
use domain_policy::PolicyTable;

use crate::claim::ClaimRecord;
use crate::classifier::{Classifier, ImageReference};
use crate::document::ClaimDocument;
use crate::error::ClaimError;
use crate::notification::{ChannelOutcome, NotificationReport};
use crate::payout;
use crate::ports::{DocumentStore, Notifier};

/// Default bounded wait for notification delivery
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(10);

/// A processed claim together with its notification outcomes
#[derive(Debug, Clone)]
pub struct ClaimOutcome {
    pub record: ClaimRecord,
    pub notifications: NotificationReport,
}

/// Sequences the claim pipeline
///
/// Cheap to clone; all collaborators are shared behind `Arc`.
#[derive(Clone)]
pub struct ClaimOrchestrator {
    policies: Arc<PolicyTable>,
    classifier: Arc<dyn Classifier>,
    documents: Option<Arc<dyn DocumentStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    notification_timeout: Duration,
}

impl ClaimOrchestrator {
    pub fn new(policies: Arc<PolicyTable>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            policies,
            classifier,
            documents: None,
            notifier: None,
            notification_timeout: DEFAULT_NOTIFICATION_TIMEOUT,
        }
    }

    pub fn with_document_store(mut self, documents: Arc<dyn DocumentStore>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_notification_timeout(mut self, timeout: Duration) -> Self {
        self.notification_timeout = timeout;
        self
    }

    pub fn policies(&self) -> &Arc<PolicyTable> {
        &self.policies
    }

    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }

    pub fn document_store(&self) -> Option<&Arc<dyn DocumentStore>> {
        self.documents.as_ref()
    }

    /// Processes a claim and returns its record
    ///
    /// # Errors
    ///
    /// `ClaimError::Validation` for an empty policy id or malformed email,
    /// `ClaimError::ClassificationFailed` when the classifier fails,
    /// `ClaimError::Payout` when the assessed cost is not in the policy's
    /// currency. No record exists in any of these cases.
    pub async fn process(
        &self,
        policy_id: &str,
        image: &ImageReference,
        email: Option<&str>,
    ) -> Result<ClaimRecord, ClaimError> {
        self.process_with_report(policy_id, image, email)
            .await
            .map(|outcome| outcome.record)
    }

    /// Processes a claim and returns its record with notification outcomes
    pub async fn process_with_report(
        &self,
        policy_id: &str,
        image: &ImageReference,
        email: Option<&str>,
    ) -> Result<ClaimOutcome, ClaimError> {
        self.process_as(ClaimId::new(), policy_id, image, email).await
    }

    /// Processes a claim under an identifier the caller generated
    ///
    /// Used when the identifier is needed before classification, e.g. to
    /// name the stored upload.
    pub async fn process_as(
        &self,
        claim_id: ClaimId,
        policy_id: &str,
        image: &ImageReference,
        email: Option<&str>,
    ) -> Result<ClaimOutcome, ClaimError> {
        let policy_id = policy_id.trim();
        let email = email.map(str::trim).filter(|e| !e.is_empty());
        Self::validate(policy_id, email)?;

        info!(claim_id = %claim_id, policy_id = %policy_id, image = %image.name, "Processing claim");

        let damage = self.classifier.classify(image).await.map_err(|e| {
            error!(claim_id = %claim_id, classifier = %self.classifier.kind(), error = %e, "Classification failed");
            ClaimError::ClassificationFailed(e)
        })?;
        info!(
            claim_id = %claim_id,
            damage_type = %damage.damage_type,
            severity = %damage.severity,
            estimated_cost = %damage.estimated_cost.amount(),
            "Damage classified"
        );

        let policy = self.policies.lookup(policy_id, &damage.damage_type);
        let decision = payout::calculate(&damage, &policy).map_err(|e| {
            error!(claim_id = %claim_id, policy_id = %policy.policy_id, error = %e, "Payout calculation failed");
            e
        })?;
        info!(
            claim_id = %claim_id,
            is_covered = policy.is_covered,
            payout = %decision.payout_amount.amount(),
            status = %decision.status,
            "Payout decided"
        );

        let mut record = ClaimRecord::assemble(claim_id, damage, policy, decision);

        if let Some(reference) = self.render_document(&record).await {
            record.attach_document(reference);
        }

        let notifications = self.notify(&record, email).await;

        Ok(ClaimOutcome {
            record,
            notifications,
        })
    }

    async fn render_document(&self, record: &ClaimRecord) -> Option<String> {
        let documents = self.documents.as_ref()?;
        let document = ClaimDocument::from_claim(record);

        match documents.render(&document).await {
            Ok(reference) => {
                info!(claim_id = %record.claim_id, filename = %reference.filename, "Claim document rendered");
                Some(reference.filename)
            }
            Err(e) => {
                let error = ClaimError::Rendering(e);
                warn!(claim_id = %record.claim_id, error = %error, "Continuing without claim document");
                None
            }
        }
    }

    async fn notify(&self, record: &ClaimRecord, email: Option<&str>) -> NotificationReport {
        let Some(notifier) = self.notifier.clone() else {
            return NotificationReport::new();
        };

        let channels = notifier.channels();
        let task_record = record.clone();
        let contact = email.map(str::to_string);
        let mut handle = tokio::spawn(async move {
            notifier.notify(&task_record, contact.as_deref()).await
        });

        let report = match tokio::time::timeout(self.notification_timeout, &mut handle).await {
            Ok(Ok(report)) => report,
            Ok(Err(join_error)) => {
                error!(claim_id = %record.claim_id, error = %join_error, "Notification task failed");
                NotificationReport::all_failed(channels, "notification task failed")
            }
            Err(_) => {
                handle.abort();
                let reason = format!(
                    "timed out after {}s",
                    self.notification_timeout.as_secs_f64()
                );
                NotificationReport::all_failed(channels, &reason)
            }
        };

        for (channel, outcome) in report.iter() {
            let ChannelOutcome::Failed(reason) = outcome else {
                continue;
            };
            let error = ClaimError::Notification {
                channel: channel.to_string(),
                message: reason.clone(),
            };
            warn!(claim_id = %record.claim_id, error = %error, "Notification not delivered");
        }

        report
    }

    /// Rejects submissions no agent should run for
    ///
    /// # Errors
    ///
    /// `ClaimError::Validation` for a blank policy id or a malformed email.
    pub fn validate(policy_id: &str, email: Option<&str>) -> Result<(), ClaimError> {
        if policy_id.trim().is_empty() {
            return Err(ClaimError::validation_field("policy_id", "policy id is required"));
        }
        if let Some(email) = email {
            if !email.validate_email() {
                return Err(ClaimError::validation_field(
                    "email",
                    format!("'{}' is not a valid email address", email),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_submission() {
        assert!(ClaimOrchestrator::validate("POL001", None).is_ok());
        assert!(ClaimOrchestrator::validate("POL001", Some("driver@example.com")).is_ok());
        assert!(ClaimOrchestrator::validate("", None).is_err());
        assert!(ClaimOrchestrator::validate("POL001", Some("not-an-email")).is_err());
    }
}
