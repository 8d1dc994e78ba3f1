//! Damage assessment produced by a classifier

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;
use crate::error::ClaimError;

/// Damage severity
///
/// Classifier replies using `low`/`medium`/`high` are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[serde(alias = "low")]
    Minor,
    #[serde(alias = "medium")]
    Moderate,
    #[serde(alias = "high")]
    Severe,
    TotalLoss,
}

impl Severity {
    /// All severities in ascending order
    pub const ALL: [Severity; 4] = [
        Severity::Minor,
        Severity::Moderate,
        Severity::Severe,
        Severity::TotalLoss,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
            Severity::TotalLoss => "total_loss",
        }
    }

    /// Label for documents and messages
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Minor => "Minor",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
            Severity::TotalLoss => "Total Loss",
        }
    }

    /// Typical repair cost range (inclusive) used by the random mock classifier
    pub fn cost_band(&self) -> (Decimal, Decimal) {
        match self {
            Severity::Minor => (dec!(500), dec!(2000)),
            Severity::Moderate => (dec!(2000), dec!(8000)),
            Severity::Severe => (dec!(8000), dec!(20000)),
            Severity::TotalLoss => (dec!(20000), dec!(50000)),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "minor" | "low" => Ok(Severity::Minor),
            "moderate" | "medium" => Ok(Severity::Moderate),
            "severe" | "high" => Ok(Severity::Severe),
            "total_loss" => Ok(Severity::TotalLoss),
            other => Err(ClaimError::validation_field(
                "severity",
                format!("unknown severity '{}'", other),
            )),
        }
    }
}

/// Classifier output for one claim image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageAssessment {
    /// Free-form damage category, e.g. "Major Frontal Collision"
    pub damage_type: String,
    pub severity: Severity,
    /// Estimated repair cost
    pub estimated_cost: Money,
    /// Classifier confidence in `[0, 1]`
    pub confidence: f64,
}

impl DamageAssessment {
    /// Creates a validated assessment
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::Validation` for a blank damage type, a negative
    /// cost, or a confidence outside `[0, 1]`.
    pub fn new(
        damage_type: impl Into<String>,
        severity: Severity,
        estimated_cost: Money,
        confidence: f64,
    ) -> Result<Self, ClaimError> {
        let damage_type = damage_type.into();
        if damage_type.trim().is_empty() {
            return Err(ClaimError::validation_field("damage_type", "damage type is empty"));
        }
        if estimated_cost.is_negative() {
            return Err(ClaimError::validation_field(
                "estimated_cost",
                format!("estimated cost must not be negative, got {}", estimated_cost.amount()),
            ));
        }
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(ClaimError::validation_field(
                "confidence",
                format!("confidence must be within [0, 1], got {}", confidence),
            ));
        }

        Ok(Self {
            damage_type,
            severity,
            estimated_cost,
            confidence,
        })
    }

    /// Confidence as a whole percentage
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}
