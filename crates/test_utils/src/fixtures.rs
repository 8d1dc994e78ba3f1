//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the claims pipeline.
//! These fixtures are consistent and predictable for unit tests.

use std::path::PathBuf;

use core_kernel::{ClaimId, Money};
use domain_claims::{DamageAssessment, Severity};
use domain_policy::{PolicyRecord, PolicyTable};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Standard deductible of the demo policies
    pub fn usd_deductible() -> Money {
        Money::usd(dec!(500.00))
    }

    /// Coverage limit of POL001 and the default terms
    pub fn usd_coverage_limit() -> Money {
        Money::usd(dec!(50000.00))
    }
}

/// Fixture for damage assessments matching the keyword classifier
pub struct DamageFixtures;

impl DamageFixtures {
    /// What the keyword classifier reports for `heavy`/`total` images
    pub fn heavy_collision() -> DamageAssessment {
        assessment("Major Frontal Collision", Severity::Severe, dec!(4500.00), 0.98)
    }

    /// What the keyword classifier reports for `scratch` images
    pub fn paint_scratch() -> DamageAssessment {
        assessment("Paint Scratch", Severity::Minor, dec!(350.00), 0.85)
    }

    pub fn hail() -> DamageAssessment {
        assessment("Hail Damage", Severity::Moderate, dec!(2400.00), 0.91)
    }

    /// A damage type no demo policy covers
    pub fn mechanical_failure() -> DamageAssessment {
        assessment("Mechanical Failure", Severity::Moderate, dec!(3000.00), 0.90)
    }
}

fn assessment(damage_type: &str, severity: Severity, cost: rust_decimal::Decimal, confidence: f64) -> DamageAssessment {
    DamageAssessment {
        damage_type: damage_type.to_string(),
        severity,
        estimated_cost: Money::usd(cost),
        confidence,
    }
}

/// Fixture for policy records resolved from the built-in table
pub struct PolicyFixtures;

impl PolicyFixtures {
    pub fn table() -> PolicyTable {
        PolicyTable::builtin()
    }

    /// POL001 resolved for a damage type
    pub fn pol001(damage_type: &str) -> PolicyRecord {
        Self::table().lookup(StringFixtures::policy_id(), damage_type)
    }

    /// POL003 resolved for a damage type
    pub fn pol003(damage_type: &str) -> PolicyRecord {
        Self::table().lookup("POL003", damage_type)
    }

    /// An unknown policy id, answered with the default terms
    pub fn unknown(damage_type: &str) -> PolicyRecord {
        Self::table().lookup(StringFixtures::unknown_policy_id(), damage_type)
    }
}

/// Fixture for IDs
pub struct IdFixtures;

impl IdFixtures {
    /// Deterministic claim id for snapshot-style assertions
    pub fn claim_id() -> ClaimId {
        ClaimId::from_uuid(Uuid::from_u128(0x0f8e6a2c_1b7d_4c1e_9a55_3f2a1d0c9b8e))
    }
}

/// Fixture for string data
pub struct StringFixtures;

impl StringFixtures {
    pub fn policy_id() -> &'static str {
        "POL001"
    }

    pub fn unknown_policy_id() -> &'static str {
        "POL404"
    }

    pub fn email() -> &'static str {
        "driver@example.com"
    }

    pub fn heavy_image() -> &'static str {
        "heavy_front.jpg"
    }

    pub fn scratch_image() -> &'static str {
        "scratch_door.jpg"
    }
}

/// Unique scratch directory under the system temp dir
pub fn scratch_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("claimflow-{}-{}", label, Uuid::new_v4()))
}
