//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_claims::{PayoutDecision, PayoutStatus};
use rust_decimal::Decimal;

/// Asserts that an amount carries at most two decimal places
pub fn assert_cents(amount: Decimal) {
    assert!(
        amount.round_dp(2) == amount,
        "Expected at most two decimal places, got {}",
        amount
    );
}

/// Asserts the invariants every covered or uncovered payout decision holds
///
/// - payout is never negative and never above the coverage limit
/// - payout is whole cents within a cent of the exact capped excess
/// - an approved status means the exact excess was positive
pub fn assert_payout_invariants(decision: &PayoutDecision, coverage_limit: &Money) {
    let payout = decision.payout_amount.amount();

    assert!(payout >= Decimal::ZERO, "Negative payout: {}", payout);
    assert!(
        payout <= coverage_limit.amount(),
        "Payout {} exceeds coverage limit {}",
        payout,
        coverage_limit.amount()
    );
    assert_cents(payout);

    let exact = (decision.estimated_cost.amount() - decision.deductible.amount())
        .max(Decimal::ZERO)
        .min(coverage_limit.amount());
    match decision.status {
        PayoutStatus::Approved => {
            assert!(exact > Decimal::ZERO, "Approved with no excess over the deductible");
            assert!(
                (payout - exact).abs() < Decimal::new(1, 2),
                "Payout {} is not the capped excess {} in cents",
                payout,
                exact
            );
        }
        PayoutStatus::DeniedBelowDeductible => {
            assert_eq!(exact, Decimal::ZERO, "Denied below deductible with excess {}", exact);
            assert!(payout.is_zero(), "Denied payout should be zero, got {}", payout);
        }
        PayoutStatus::DeniedNotCovered => {
            assert!(payout.is_zero(), "Denied payout should be zero, got {}", payout);
        }
    }
}

/// Asserts an approved payout of exactly `expected`
pub fn assert_approved(decision: &PayoutDecision, expected: Decimal) {
    assert_eq!(
        decision.status,
        PayoutStatus::Approved,
        "Expected approved payout of {}, got {}",
        expected,
        decision.status
    );
    assert_eq!(decision.payout_amount.amount(), expected);
}

/// Asserts a zero payout with the given denial status
pub fn assert_denied(decision: &PayoutDecision, status: PayoutStatus) {
    assert_eq!(decision.status, status);
    assert!(
        decision.payout_amount.is_zero(),
        "Denied payout should be zero, got {}",
        decision.payout_amount.amount()
    );
}
