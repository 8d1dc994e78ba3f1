//! Policy record produced by a lookup

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use core_kernel::Money;

/// Where the terms of a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicySource {
    /// The policy id was found in the table
    Registered,
    /// The policy id was unknown and the default terms were substituted
    Default,
}

/// Policy information for one claim, with the coverage verdict for its damage type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRecord {
    /// Policy identifier as submitted
    pub policy_id: String,
    /// Deductible
    pub deductible: Money,
    /// Coverage limit
    pub coverage_limit: Money,
    /// Covered damage keywords
    pub covered_damage_types: BTreeSet<String>,
    /// Whether the claim's damage type is covered
    pub is_covered: bool,
    /// Human-readable coverage verdict
    pub coverage_details: String,
    /// Registered policy or default fallback
    pub source: PolicySource,
}

impl PolicyRecord {
    /// Returns true when the record was built from the default terms
    pub fn used_default(&self) -> bool {
        self.source == PolicySource::Default
    }
}

/// Formats the coverage verdict shown to the claimant
pub(crate) fn coverage_details(damage_type: &str, is_covered: bool) -> String {
    if is_covered {
        format!("Damage type '{}' is covered under your policy.", damage_type)
    } else {
        format!("Damage type '{}' is NOT covered under your policy.", damage_type)
    }
}
