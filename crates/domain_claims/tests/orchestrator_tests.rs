//! Claim orchestrator tests with in-process collaborators

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal_macros::dec;

use core_kernel::{Currency, DomainPort, PortError};
use domain_claims::{
    ChannelOutcome, ClaimDocument, ClaimError, ClaimOrchestrator, ClaimRecord, Classifier,
    ClassifierKind, DamageAssessment, DocumentReference, DocumentStore, ImageReference,
    KeywordMockClassifier, NotificationReport, Notifier, PayoutStatus, RandomMockClassifier,
    StoredDocument,
};
use domain_policy::{PolicySource, PolicyTable, PolicyTerms};

// ============================================================================
// Test Collaborators
// ============================================================================

struct FailingClassifier;

impl DomainPort for FailingClassifier {}

#[async_trait]
impl Classifier for FailingClassifier {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::RealModel
    }

    async fn classify(&self, _image: &ImageReference) -> Result<DamageAssessment, PortError> {
        Err(PortError::connection("vision model unreachable"))
    }
}

#[derive(Default)]
struct MemoryDocumentStore {
    rendered: Mutex<Vec<ClaimDocument>>,
    fail: bool,
}

impl DomainPort for MemoryDocumentStore {}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn render(&self, document: &ClaimDocument) -> Result<DocumentReference, PortError> {
        if self.fail {
            return Err(PortError::internal("disk full"));
        }
        self.rendered.lock().unwrap().push(document.clone());
        Ok(DocumentReference {
            key: document.key.clone(),
            filename: format!("claim_{}.pdf", document.key),
        })
    }

    async fn load(&self, key: &str) -> Result<StoredDocument, PortError> {
        Err(PortError::not_found("Document", key))
    }
}

struct RecordingNotifier {
    delay: Duration,
    calls: AtomicUsize,
    contacts: Mutex<Vec<Option<String>>>,
}

impl RecordingNotifier {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
            contacts: Mutex::new(Vec::new()),
        }
    }
}

impl DomainPort for RecordingNotifier {}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn channels(&self) -> Vec<String> {
        vec!["slack".to_string(), "email".to_string()]
    }

    async fn notify(&self, _claim: &ClaimRecord, contact: Option<&str>) -> NotificationReport {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.contacts.lock().unwrap().push(contact.map(str::to_string));
        tokio::time::sleep(self.delay).await;

        let mut report = NotificationReport::new();
        report.record("slack", ChannelOutcome::Failed("webhook returned 500".into()));
        report.record("email", ChannelOutcome::Sent);
        report
    }
}

fn orchestrator() -> ClaimOrchestrator {
    ClaimOrchestrator::new(Arc::new(PolicyTable::builtin()), Arc::new(KeywordMockClassifier::new()))
}

// ============================================================================
// Pipeline
// ============================================================================

mod pipeline_tests {
    use super::*;

    #[tokio::test]
    async fn test_heavy_collision_is_approved() {
        let record = orchestrator()
            .process("POL001", &ImageReference::named("heavy_damage.jpg"), None)
            .await
            .unwrap();

        assert_eq!(record.damage.damage_type, "Major Frontal Collision");
        assert!(record.policy.is_covered);
        assert_eq!(record.payout.payout_amount.amount(), dec!(4000.00));
        assert_eq!(record.payout.status, PayoutStatus::Approved);
        assert!(record.document_reference.is_none());
        assert!(record.claim_id.to_string().starts_with("CLM-"));
    }

    #[tokio::test]
    async fn test_dent_is_not_covered() {
        let record = orchestrator()
            .process("POL002", &ImageReference::named("car.png"), None)
            .await
            .unwrap();

        assert_eq!(record.damage.damage_type, "Front Bumper Dent");
        assert!(!record.policy.is_covered);
        assert_eq!(record.payout.status, PayoutStatus::DeniedNotCovered);
        assert!(record.payout.payout_amount.is_zero());
    }

    #[tokio::test]
    async fn test_unknown_policy_uses_default() {
        let record = orchestrator()
            .process("NO-SUCH-POLICY", &ImageReference::named("total.jpg"), None)
            .await
            .unwrap();

        assert_eq!(record.policy.source, PolicySource::Default);
        assert_eq!(record.policy.deductible.amount(), dec!(500));
        assert_eq!(record.payout.status, PayoutStatus::Approved);
    }

    #[tokio::test]
    async fn test_claim_ids_are_unique() {
        let orchestrator = orchestrator();
        let image = ImageReference::named("scratch.jpg");
        let (a, b) = tokio::join!(
            orchestrator.process("POL001", &image, None),
            orchestrator.process("POL001", &image, None)
        );
        assert_ne!(a.unwrap().claim_id, b.unwrap().claim_id);
    }

    #[tokio::test]
    async fn test_random_classifier_pipeline() {
        let orchestrator = ClaimOrchestrator::new(
            Arc::new(PolicyTable::builtin()),
            Arc::new(RandomMockClassifier::with_seed(42)),
        );
        let record = orchestrator
            .process("POL002", &ImageReference::named("photo.jpg"), None)
            .await
            .unwrap();

        assert!(record.payout.payout_amount <= record.policy.coverage_limit);
        assert!(!record.payout.payout_amount.is_negative());
    }
}

// ============================================================================
// Failures
// ============================================================================

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_classifier_failure_yields_no_record() {
        let orchestrator =
            ClaimOrchestrator::new(Arc::new(PolicyTable::builtin()), Arc::new(FailingClassifier));
        let result = orchestrator
            .process("POL001", &ImageReference::named("photo.jpg"), None)
            .await;

        let error = result.unwrap_err();
        assert!(matches!(error, ClaimError::ClassificationFailed(_)));
        assert!(error.is_fatal());
    }

    #[tokio::test]
    async fn test_empty_policy_id_rejected_before_classification() {
        let orchestrator =
            ClaimOrchestrator::new(Arc::new(PolicyTable::builtin()), Arc::new(FailingClassifier));
        let result = orchestrator.process("   ", &ImageReference::named("x.jpg"), None).await;

        assert!(matches!(result, Err(ClaimError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_malformed_email_rejected() {
        let result = orchestrator()
            .process("POL001", &ImageReference::named("x.jpg"), Some("nobody"))
            .await;
        assert!(matches!(result, Err(ClaimError::Validation { field: Some(ref f), .. }) if f == "email"));
    }

    #[tokio::test]
    async fn test_rendering_failure_keeps_decision() {
        let store = Arc::new(MemoryDocumentStore {
            fail: true,
            ..Default::default()
        });
        let record = orchestrator()
            .with_document_store(store)
            .process("POL001", &ImageReference::named("heavy.jpg"), None)
            .await
            .unwrap();

        assert!(record.document_reference.is_none());
        assert_eq!(record.payout.status, PayoutStatus::Approved);
    }

    #[tokio::test]
    async fn test_policy_in_other_currency_is_payout_error() {
        let euro_terms =
            PolicyTerms::new("EUR001", dec!(500), dec!(50000), Currency::EUR, ["collision"]).unwrap();
        let table = PolicyTable::new(euro_terms);
        let orchestrator = ClaimOrchestrator::new(Arc::new(table), Arc::new(KeywordMockClassifier::new()));

        let result = orchestrator
            .process("EUR001", &ImageReference::named("heavy.jpg"), None)
            .await;

        let error = result.unwrap_err();
        assert!(matches!(error, ClaimError::Payout(_)));
        assert!(error.is_fatal());
    }
}

// ============================================================================
// Documents and Notifications
// ============================================================================

mod collaborator_tests {
    use super::*;

    #[tokio::test]
    async fn test_document_reference_attached() {
        let store = Arc::new(MemoryDocumentStore::default());
        let record = orchestrator()
            .with_document_store(store.clone())
            .process("POL003", &ImageReference::named("scratch.jpg"), None)
            .await
            .unwrap();

        let rendered = store.rendered.lock().unwrap();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].key, record.claim_id.to_string());
        assert_eq!(
            record.document_reference.as_deref(),
            Some(format!("claim_{}.pdf", record.claim_id).as_str())
        );
        assert_eq!(rendered[0].value("Payout Calculation", "Status"), Some("Denied Not Covered"));
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_claim() {
        let notifier = Arc::new(RecordingNotifier::new(Duration::ZERO));
        let outcome = orchestrator()
            .with_notifier(notifier.clone())
            .process_with_report("POL001", &ImageReference::named("heavy.jpg"), Some("a@b.com"))
            .await
            .unwrap();

        assert_eq!(outcome.record.payout.status, PayoutStatus::Approved);
        assert!(outcome.notifications.get("slack").unwrap().is_failed());
        assert!(outcome.notifications.get("email").unwrap().is_sent());
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.contacts.lock().unwrap()[0].as_deref(), Some("a@b.com"));
    }

    #[tokio::test]
    async fn test_notification_timeout_reports_failed() {
        let notifier = Arc::new(RecordingNotifier::new(Duration::from_secs(30)));
        let outcome = orchestrator()
            .with_notifier(notifier)
            .with_notification_timeout(Duration::from_millis(50))
            .process_with_report("POL001", &ImageReference::named("heavy.jpg"), None)
            .await
            .unwrap();

        assert_eq!(outcome.record.payout.payout_amount.amount(), dec!(4000));
        for channel in ["slack", "email"] {
            match outcome.notifications.get(channel) {
                Some(ChannelOutcome::Failed(reason)) => assert!(reason.contains("timed out")),
                other => panic!("unexpected outcome for {}: {:?}", channel, other),
            }
        }
    }

    #[tokio::test]
    async fn test_without_notifier_report_is_empty() {
        let outcome = orchestrator()
            .process_with_report("POL001", &ImageReference::named("a.jpg"), None)
            .await
            .unwrap();
        assert!(outcome.notifications.is_empty());
    }
}
