//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! Tests specify only the relevant fields and take defaults for the rest.

use std::collections::BTreeSet;

use core_kernel::{ClaimId, Money};
use domain_claims::{calculate, ClaimRecord, DamageAssessment, Severity};
use domain_policy::{PolicyRecord, PolicySource};
use rust_decimal::Decimal;

use crate::fixtures::{DamageFixtures, MoneyFixtures, StringFixtures};

/// Builder for damage assessments
pub struct DamageAssessmentBuilder {
    damage_type: String,
    severity: Severity,
    estimated_cost: Money,
    confidence: f64,
}

impl Default for DamageAssessmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DamageAssessmentBuilder {
    /// Starts from the heavy collision fixture
    pub fn new() -> Self {
        let base = DamageFixtures::heavy_collision();
        Self {
            damage_type: base.damage_type,
            severity: base.severity,
            estimated_cost: base.estimated_cost,
            confidence: base.confidence,
        }
    }

    pub fn with_damage_type(mut self, damage_type: impl Into<String>) -> Self {
        self.damage_type = damage_type.into();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the estimated cost in USD
    pub fn with_cost(mut self, cost: Decimal) -> Self {
        self.estimated_cost = Money::usd(cost);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Builds without validation so tests can construct invalid values
    pub fn build(self) -> DamageAssessment {
        DamageAssessment {
            damage_type: self.damage_type,
            severity: self.severity,
            estimated_cost: self.estimated_cost,
            confidence: self.confidence,
        }
    }
}

/// Builder for resolved policy records
pub struct PolicyRecordBuilder {
    policy_id: String,
    deductible: Money,
    coverage_limit: Money,
    covered_damage_types: BTreeSet<String>,
    is_covered: bool,
}

impl Default for PolicyRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyRecordBuilder {
    /// Creates a covered POL001-like record
    pub fn new() -> Self {
        Self {
            policy_id: StringFixtures::policy_id().to_string(),
            deductible: MoneyFixtures::usd_deductible(),
            coverage_limit: MoneyFixtures::usd_coverage_limit(),
            covered_damage_types: ["collision", "hail", "flood", "fire"]
                .into_iter()
                .map(String::from)
                .collect(),
            is_covered: true,
        }
    }

    pub fn with_policy_id(mut self, policy_id: impl Into<String>) -> Self {
        self.policy_id = policy_id.into();
        self
    }

    /// Sets the deductible in USD
    pub fn with_deductible(mut self, amount: Decimal) -> Self {
        self.deductible = Money::usd(amount);
        self
    }

    /// Sets the coverage limit in USD
    pub fn with_coverage_limit(mut self, amount: Decimal) -> Self {
        self.coverage_limit = Money::usd(amount);
        self
    }

    pub fn covered(mut self, is_covered: bool) -> Self {
        self.is_covered = is_covered;
        self
    }

    pub fn build(self) -> PolicyRecord {
        let coverage_details = if self.is_covered {
            "Covered under policy".to_string()
        } else {
            "Not covered under policy".to_string()
        };

        PolicyRecord {
            policy_id: self.policy_id,
            deductible: self.deductible,
            coverage_limit: self.coverage_limit,
            covered_damage_types: self.covered_damage_types,
            is_covered: self.is_covered,
            coverage_details,
            source: PolicySource::Registered,
        }
    }
}

/// Builder for claim records
///
/// The payout is always computed from the damage and policy.
pub struct ClaimRecordBuilder {
    claim_id: ClaimId,
    damage: DamageAssessment,
    policy: PolicyRecord,
    document_reference: Option<String>,
}

impl Default for ClaimRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimRecordBuilder {
    pub fn new() -> Self {
        Self {
            claim_id: ClaimId::new(),
            damage: DamageAssessmentBuilder::new().build(),
            policy: PolicyRecordBuilder::new().build(),
            document_reference: None,
        }
    }

    pub fn with_claim_id(mut self, claim_id: ClaimId) -> Self {
        self.claim_id = claim_id;
        self
    }

    pub fn with_damage(mut self, damage: DamageAssessment) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_policy(mut self, policy: PolicyRecord) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_document(mut self, reference: impl Into<String>) -> Self {
        self.document_reference = Some(reference.into());
        self
    }

    /// # Panics
    ///
    /// Panics if the damage and policy currencies differ
    pub fn build(self) -> ClaimRecord {
        let payout =
            calculate(&self.damage, &self.policy).expect("damage and policy share a currency");

        let mut record = ClaimRecord::assemble(self.claim_id, self.damage, self.policy, payout);
        if let Some(reference) = self.document_reference {
            record.attach_document(reference);
        }
        record
    }
}
