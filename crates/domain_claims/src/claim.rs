//! Claim record
//!
//! One record per submitted claim. The decision fields are fixed at
//! assembly; only the document reference may be attached afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::ClaimId;
use domain_policy::PolicyRecord;

use crate::assessment::DamageAssessment;
use crate::payout::PayoutDecision;

/// The result of processing one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub claim_id: ClaimId,
    pub damage: DamageAssessment,
    pub policy: PolicyRecord,
    pub payout: PayoutDecision,
    pub created_at: DateTime<Utc>,
    /// File name of the rendered document, if rendering succeeded
    pub document_reference: Option<String>,
}

impl ClaimRecord {
    /// Assembles a record stamped with the current time
    pub fn assemble(
        claim_id: ClaimId,
        damage: DamageAssessment,
        policy: PolicyRecord,
        payout: PayoutDecision,
    ) -> Self {
        Self {
            claim_id,
            damage,
            policy,
            payout,
            created_at: Utc::now(),
            document_reference: None,
        }
    }

    /// Attaches the reference returned by the document store
    pub fn attach_document(&mut self, reference: impl Into<String>) {
        self.document_reference = Some(reference.into());
    }

    /// Returns true when the payout was approved
    pub fn is_approved(&self) -> bool {
        self.payout.status.is_approved()
    }

    /// Key under which documents for this claim are stored
    pub fn document_key(&self) -> String {
        self.claim_id.to_string()
    }
}
