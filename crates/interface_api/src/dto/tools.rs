//! Skill DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use domain_claims::{DamageAssessment, PayoutStatus, Severity};

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeImageQuery {
    #[validate(length(min = 1, message = "image_name is required"))]
    pub image_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeImageResponse {
    pub damage_type: String,
    pub severity: Severity,
    pub estimated_cost: Decimal,
    pub confidence: f64,
}

impl From<DamageAssessment> for AnalyzeImageResponse {
    fn from(damage: DamageAssessment) -> Self {
        Self {
            damage_type: damage.damage_type,
            severity: damage.severity,
            estimated_cost: damage.estimated_cost.amount(),
            confidence: damage.confidence,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CalculatePayoutRequest {
    #[validate(length(min = 1, message = "policy_id is required"))]
    pub policy_id: String,
    #[validate(custom(function = "non_negative"))]
    pub repair_cost: Decimal,
    /// Replaces the policy deductible when present
    #[validate(custom(function = "non_negative"))]
    pub deductible: Option<Decimal>,
    /// Coverage is assumed when absent
    pub damage_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalculatePayoutResponse {
    pub policy_id: String,
    pub payout: Decimal,
    pub status: PayoutStatus,
    pub offer_id: String,
    pub offer_letter_url: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GeneratePdfRequest {
    pub claim_id: Option<String>,
    #[validate(length(min = 1, message = "policy_id is required"))]
    pub policy_id: String,
    #[validate(custom(function = "non_negative"))]
    pub final_amount: Decimal,
    #[validate(length(min = 1, message = "damage_type is required"))]
    pub damage_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratePdfResponse {
    pub message: String,
    pub filename: String,
    pub download_url: String,
}
