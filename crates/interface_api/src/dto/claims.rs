//! Claims DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use domain_claims::{ClaimRecord, NotificationReport, PayoutStatus, Severity};
use domain_policy::PolicySource;

/// Processing status reported for every successfully processed claim
pub const STATUS_PROCESSED: &str = "processed";

#[derive(Debug, Serialize, Deserialize)]
pub struct DamageResponse {
    pub damage_type: String,
    pub severity: Severity,
    pub estimated_cost: Decimal,
    pub confidence: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PolicyResponse {
    pub policy_id: String,
    pub deductible: Decimal,
    pub coverage_limit: Decimal,
    pub is_covered: bool,
    pub coverage_details: String,
    pub source: PolicySource,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PayoutResponse {
    pub estimated_cost: Decimal,
    pub deductible: Decimal,
    pub payout_amount: Decimal,
    pub currency: String,
    pub status: PayoutStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimProcessResponse {
    pub claim_id: String,
    pub status: String,
    pub damage: DamageResponse,
    pub policy: PolicyResponse,
    pub payout: PayoutResponse,
    pub created_at: DateTime<Utc>,
    pub document_reference: Option<String>,
    pub pdf_url: Option<String>,
    pub notifications: NotificationReport,
}

impl ClaimProcessResponse {
    pub fn new(record: ClaimRecord, notifications: NotificationReport, pdf_url: Option<String>) -> Self {
        Self {
            claim_id: record.claim_id.to_string(),
            status: STATUS_PROCESSED.to_string(),
            damage: DamageResponse {
                damage_type: record.damage.damage_type,
                severity: record.damage.severity,
                estimated_cost: record.damage.estimated_cost.amount(),
                confidence: record.damage.confidence,
            },
            policy: PolicyResponse {
                policy_id: record.policy.policy_id,
                deductible: record.policy.deductible.amount(),
                coverage_limit: record.policy.coverage_limit.amount(),
                is_covered: record.policy.is_covered,
                coverage_details: record.policy.coverage_details,
                source: record.policy.source,
            },
            payout: PayoutResponse {
                estimated_cost: record.payout.estimated_cost.amount(),
                deductible: record.payout.deductible.amount(),
                payout_amount: record.payout.payout_amount.amount(),
                currency: record.payout.payout_amount.currency().code().to_string(),
                status: record.payout.status,
            },
            created_at: record.created_at,
            document_reference: record.document_reference,
            pdf_url,
            notifications,
        }
    }
}
