//! Payout calculation
//!
//! The single source of truth for the payout formula:
//!
//! ```text
//! not covered         -> 0, denied_not_covered
//! raw    = max(0, estimated_cost - deductible)
//! capped = min(raw, coverage_limit)
//! capped > 0          -> approved
//! otherwise           -> denied_below_deductible
//! payout = min(round_cents(capped), floor_cents(coverage_limit))
//! ```
//!
//! All three amounts must share one currency.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::Money;
use domain_policy::PolicyRecord;

use crate::assessment::DamageAssessment;
use crate::error::ClaimError;

/// Outcome of the payout calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Approved,
    DeniedNotCovered,
    DeniedBelowDeductible,
}

impl PayoutStatus {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutStatus::Approved => "approved",
            PayoutStatus::DeniedNotCovered => "denied_not_covered",
            PayoutStatus::DeniedBelowDeductible => "denied_below_deductible",
        }
    }

    /// Title-cased label, e.g. "Denied Below Deductible"
    pub fn title(&self) -> &'static str {
        match self {
            PayoutStatus::Approved => "Approved",
            PayoutStatus::DeniedNotCovered => "Denied Not Covered",
            PayoutStatus::DeniedBelowDeductible => "Denied Below Deductible",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, PayoutStatus::Approved)
    }
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payout decision for one claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutDecision {
    pub estimated_cost: Money,
    pub deductible: Money,
    pub payout_amount: Money,
    pub status: PayoutStatus,
}

/// Calculates the payout for an assessment under a policy record
///
/// Pure: identical inputs always give identical output.
///
/// # Errors
///
/// `ClaimError::Payout` when the estimated cost is not in the policy's
/// currency.
pub fn calculate(damage: &DamageAssessment, policy: &PolicyRecord) -> Result<PayoutDecision, ClaimError> {
    let decision = calculate_with_terms(
        damage.estimated_cost,
        policy.deductible,
        policy.coverage_limit,
        policy.is_covered,
    )?;
    debug!(
        policy_id = %policy.policy_id,
        payout = %decision.payout_amount.amount(),
        status = %decision.status,
        "Payout calculated"
    );
    Ok(decision)
}

/// Calculates a payout from raw terms
///
/// Used directly by the payout skill, where the caller may override the
/// deductible and may not know the damage type.
///
/// # Errors
///
/// `ClaimError::Payout` on a currency mismatch between the three amounts.
pub fn calculate_with_terms(
    estimated_cost: Money,
    deductible: Money,
    coverage_limit: Money,
    is_covered: bool,
) -> Result<PayoutDecision, ClaimError> {
    let currency = coverage_limit.currency();
    let raw = estimated_cost.saturating_sub(&deductible)?;
    let capped = raw.min(&coverage_limit)?;

    if !is_covered {
        return Ok(PayoutDecision {
            estimated_cost,
            deductible,
            payout_amount: Money::zero(currency),
            status: PayoutStatus::DeniedNotCovered,
        });
    }

    let status = if capped.is_positive() {
        PayoutStatus::Approved
    } else {
        PayoutStatus::DeniedBelowDeductible
    };

    // a limit with sub-cent precision must not be exceeded by rounding up
    let payout = round_cents(capped.amount()).min(floor_cents(coverage_limit.amount()));

    Ok(PayoutDecision {
        estimated_cost,
        deductible,
        payout_amount: Money::new(payout, currency),
        status,
    })
}

/// Half-up rounding to two decimal places
///
/// Applied after the status is decided on the exact amount, so a payout of
/// less than half a cent (cost `500.004` over a `500` deductible) is
/// `approved` with an amount of `0.00`.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn floor_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::ToZero)
}
