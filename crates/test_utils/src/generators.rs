//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::Money;
use domain_claims::{DamageAssessment, Severity};
use domain_policy::{PolicyRecord, PolicySource};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for severity values
fn severity_strategy() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Minor),
        Just(Severity::Moderate),
        Just(Severity::Severe),
        Just(Severity::TotalLoss),
    ]
}

/// Strategy for non-negative USD amounts with up to four decimal places
pub fn usd_amount_strategy(max_cents: i64) -> impl Strategy<Value = Money> {
    (0i64..=max_cents * 100).prop_map(|units| Money::usd(Decimal::new(units, 4)))
}

/// Strategy for confidence values in `[0, 1]`
fn confidence_strategy() -> impl Strategy<Value = f64> {
    (0u32..=100u32).prop_map(|n| f64::from(n) / 100.0)
}

/// Strategy for damage type labels, some of them covered by the demo policies
fn damage_type_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Major Frontal Collision".to_string()),
        Just("Hail Damage".to_string()),
        Just("Flood".to_string()),
        Just("Vandalism".to_string()),
        Just("Paint Scratch".to_string()),
        "[A-Z][a-z]{3,12}",
    ]
}

/// Strategy for valid damage assessments
pub fn damage_assessment_strategy() -> impl Strategy<Value = DamageAssessment> {
    (
        damage_type_strategy(),
        severity_strategy(),
        usd_amount_strategy(150_000_00),
        confidence_strategy(),
    )
        .prop_map(|(damage_type, severity, estimated_cost, confidence)| DamageAssessment {
            damage_type,
            severity,
            estimated_cost,
            confidence,
        })
}

/// Strategy for resolved policy records with arbitrary terms
pub fn policy_record_strategy() -> impl Strategy<Value = PolicyRecord> {
    (
        usd_amount_strategy(5_000_00),
        usd_amount_strategy(200_000_00),
        any::<bool>(),
    )
        .prop_map(|(deductible, coverage_limit, is_covered)| PolicyRecord {
            policy_id: "POLGEN".to_string(),
            deductible,
            coverage_limit,
            covered_damage_types: Default::default(),
            is_covered,
            coverage_details: String::new(),
            source: PolicySource::Registered,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_assessments_are_valid(damage in damage_assessment_strategy()) {
            let rebuilt = DamageAssessment::new(
                damage.damage_type.clone(),
                damage.severity,
                damage.estimated_cost,
                damage.confidence,
            );
            prop_assert!(rebuilt.is_ok());
        }

        #[test]
        fn generated_amounts_are_non_negative(money in usd_amount_strategy(1_000_00)) {
            prop_assert!(!money.is_negative());
        }
    }
}
