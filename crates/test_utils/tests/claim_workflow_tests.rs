//! Integration Tests for the claims pipeline
//!
//! These tests verify end-to-end scenarios that involve the policy table,
//! the classifiers, the payout rules and the PDF document store together.

use std::sync::Arc;

use domain_claims::{
    calculate, ClaimOrchestrator, Classifier, DocumentStore, ImageReference, KeywordMockClassifier,
    PayoutStatus, RandomMockClassifier,
};
use domain_policy::PolicyTable;
use infra_adapters::PdfDocumentStore;
use rust_decimal_macros::dec;
use test_utils::*;

fn orchestrator_with_documents(dir: &std::path::Path) -> (ClaimOrchestrator, Arc<PdfDocumentStore>) {
    let documents = Arc::new(PdfDocumentStore::new(dir));
    let orchestrator = ClaimOrchestrator::new(
        Arc::new(PolicyTable::builtin()),
        Arc::new(KeywordMockClassifier::new()),
    )
    .with_document_store(documents.clone());
    (orchestrator, documents)
}

mod keyword_pipeline {
    use super::*;

    #[tokio::test]
    async fn test_heavy_collision_is_paid_and_documented() {
        let dir = scratch_dir("workflow");
        let (orchestrator, documents) = orchestrator_with_documents(&dir);

        let record = orchestrator
            .process(
                StringFixtures::policy_id(),
                &ImageReference::named(StringFixtures::heavy_image()),
                Some(StringFixtures::email()),
            )
            .await
            .unwrap();

        assert_eq!(record.damage, DamageFixtures::heavy_collision());
        assert_approved(&record.payout, dec!(4000.00));
        assert_payout_invariants(&record.payout, &record.policy.coverage_limit);

        let stored = documents.load(&record.document_key()).await.unwrap();
        assert_eq!(Some(stored.filename), record.document_reference);
        assert!(stored.bytes.starts_with(b"%PDF"));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_scratch_below_deductible_is_denied() {
        let dir = scratch_dir("workflow");
        let (orchestrator, _) = orchestrator_with_documents(&dir);

        let record = orchestrator
            .process("POL002", &ImageReference::named(StringFixtures::scratch_image()), None)
            .await
            .unwrap();

        assert_denied(&record.payout, PayoutStatus::DeniedBelowDeductible);
        assert!(record.document_reference.is_some());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_unknown_policy_uses_default_terms() {
        let dir = scratch_dir("workflow");
        let (orchestrator, _) = orchestrator_with_documents(&dir);

        let record = orchestrator
            .process(
                StringFixtures::unknown_policy_id(),
                &ImageReference::named(StringFixtures::heavy_image()),
                None,
            )
            .await
            .unwrap();

        assert!(record.policy.used_default());
        assert_eq!(record.policy.deductible, MoneyFixtures::usd_deductible());
        assert_approved(&record.payout, dec!(4000.00));

        let _ = std::fs::remove_dir_all(dir);
    }
}

mod fixture_scenarios {
    use super::*;

    #[test]
    fn test_uncovered_damage_on_pol003() {
        let decision = calculate(
            &DamageFixtures::mechanical_failure(),
            &PolicyFixtures::pol003("Mechanical Failure"),
        )
        .unwrap();
        assert_denied(&decision, PayoutStatus::DeniedNotCovered);
    }

    #[test]
    fn test_hail_on_pol001() {
        let decision = calculate(&DamageFixtures::hail(), &PolicyFixtures::pol001("Hail Damage")).unwrap();
        assert_approved(&decision, dec!(1900.00));
    }
}

mod random_classifier_pipeline {
    use super::*;

    #[tokio::test]
    async fn test_seeded_runs_respect_payout_invariants() {
        let orchestrator = ClaimOrchestrator::new(
            Arc::new(PolicyTable::builtin()),
            Arc::new(RandomMockClassifier::with_seed(7)) as Arc<dyn Classifier>,
        );

        for policy_id in ["POL001", "POL002", "POL003", "POL999"] {
            let record = orchestrator
                .process(policy_id, &ImageReference::named("photo.jpg"), None)
                .await
                .unwrap();
            assert_payout_invariants(&record.payout, &record.policy.coverage_limit);
            assert!(record.document_reference.is_none());
        }
    }
}

mod payout_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn payout_invariants_hold(damage in damage_assessment_strategy(), policy in policy_record_strategy()) {
            let decision = calculate(&damage, &policy).unwrap();
            assert_payout_invariants(&decision, &policy.coverage_limit);
            if !policy.is_covered {
                prop_assert_eq!(decision.status, PayoutStatus::DeniedNotCovered);
            }
        }
    }
}
