//! Layout-free claim documents
//!
//! A `ClaimDocument` is the content of a claim summary as labelled lines
//! grouped in sections. Stores decide how to lay it out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::Money;

use crate::claim::ClaimRecord;

/// Footer printed on every claim document
pub const DOCUMENT_FOOTER: &str =
    "This document was generated automatically by the ClaimFlow claims processing service.";

/// One labelled value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLine {
    pub label: String,
    pub value: String,
}

impl DocumentLine {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A headed group of lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub heading: String,
    pub lines: Vec<DocumentLine>,
}

impl DocumentSection {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            lines: Vec::new(),
        }
    }

    pub fn line(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.lines.push(DocumentLine::new(label, value));
        self
    }
}

/// Content of a claim summary document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimDocument {
    /// Storage key, usually the claim id
    pub key: String,
    pub title: String,
    pub issued_at: DateTime<Utc>,
    pub header: Vec<DocumentLine>,
    pub sections: Vec<DocumentSection>,
    pub footer: String,
}

impl ClaimDocument {
    /// Full claim summary for a processed claim
    pub fn from_claim(claim: &ClaimRecord) -> Self {
        let damage = &claim.damage;
        let policy = &claim.policy;
        let payout = &claim.payout;

        let coverage_status = if policy.is_covered { "Covered" } else { "Not Covered" };

        Self {
            key: claim.document_key(),
            title: "Insurance Claim Summary".to_string(),
            issued_at: claim.created_at,
            header: vec![
                DocumentLine::new("Claim ID", claim.claim_id.to_string()),
                DocumentLine::new("Date", claim.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
                DocumentLine::new("Policy ID", policy.policy_id.clone()),
            ],
            sections: vec![
                DocumentSection::new("Damage Analysis")
                    .line("Damage Type", damage.damage_type.clone())
                    .line("Severity", damage.severity.label())
                    .line("Estimated Cost", damage.estimated_cost.to_display_string())
                    .line("Confidence", format!("{}%", damage.confidence_percent())),
                DocumentSection::new("Policy Information")
                    .line("Deductible", policy.deductible.to_display_string())
                    .line("Coverage Limit", policy.coverage_limit.to_display_string())
                    .line("Coverage Status", coverage_status)
                    .line("Details", policy.coverage_details.clone()),
                DocumentSection::new("Payout Calculation")
                    .line("Estimated Cost", payout.estimated_cost.to_display_string())
                    .line("Deductible", payout.deductible.to_display_string())
                    .line("Payout Amount", payout.payout_amount.to_display_string())
                    .line("Status", payout.status.title()),
            ],
            footer: DOCUMENT_FOOTER.to_string(),
        }
    }

    /// Short offer summary for a payout computed outside the pipeline
    pub fn offer_summary(
        key: impl Into<String>,
        policy_id: &str,
        damage_type: &str,
        final_amount: Money,
    ) -> Self {
        let key = key.into();
        let issued_at = Utc::now();

        Self {
            header: vec![
                DocumentLine::new("Claim ID", key.clone()),
                DocumentLine::new("Date", issued_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
                DocumentLine::new("Policy ID", policy_id),
            ],
            key,
            title: "Settlement Offer Summary".to_string(),
            issued_at,
            sections: vec![DocumentSection::new("Offer")
                .line("Damage Type", damage_type)
                .line("Final Amount", final_amount.to_display_string())],
            footer: DOCUMENT_FOOTER.to_string(),
        }
    }

    /// Looks up a line value by section heading and label
    pub fn value(&self, heading: &str, label: &str) -> Option<&str> {
        self.sections
            .iter()
            .filter(|section| section.heading == heading)
            .flat_map(|section| section.lines.iter())
            .find(|line| line.label == label)
            .map(|line| line.value.as_str())
    }
}
