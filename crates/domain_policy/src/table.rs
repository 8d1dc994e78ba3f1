//! The policy table
//!
//! A static mapping from policy id to terms, plus the default terms used
//! for unknown ids. Built once at startup (either the built-in demo table
//! or a JSON file) and shared read-only behind an `Arc` afterwards.

use std::collections::HashMap;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing::{debug, info, warn};

use core_kernel::{Currency, Money};
use crate::coverage::{CoverageMatch, PolicyTerms};
use crate::error::PolicyError;
use crate::record::{coverage_details, PolicyRecord, PolicySource};

/// Immutable policy lookup table
#[derive(Debug, Clone)]
pub struct PolicyTable {
    policies: HashMap<String, PolicyTerms>,
    default_terms: PolicyTerms,
    matching: CoverageMatch,
}

impl PolicyTable {
    /// Creates an empty table that answers every lookup with `default_terms`
    pub fn new(default_terms: PolicyTerms) -> Self {
        Self {
            policies: HashMap::new(),
            default_terms,
            matching: CoverageMatch::default(),
        }
    }

    /// Adds or replaces the terms for a policy id
    pub fn with_policy(mut self, policy_id: impl Into<String>, terms: PolicyTerms) -> Self {
        self.policies.insert(policy_id.into(), terms);
        self
    }

    /// Selects the coverage matching mode
    pub fn with_matching(mut self, matching: CoverageMatch) -> Self {
        self.matching = matching;
        self
    }

    /// The built-in demo table: POL001, POL002, POL003 and the standard default
    pub fn builtin() -> Self {
        let terms = |deductible: Decimal, limit: Decimal, covered: &[&str]| PolicyTerms {
            deductible: Money::usd(deductible),
            coverage_limit: Money::usd(limit),
            covered_damage_types: covered.iter().map(|s| s.to_string()).collect(),
        };

        Self::new(terms(dec!(500), dec!(50000), &["collision", "hail", "flood", "fire"]))
            .with_policy("POL001", terms(dec!(500), dec!(50000), &["collision", "hail", "flood", "fire"]))
            .with_policy(
                "POL002",
                terms(dec!(1000), dec!(100000), &["collision", "hail", "flood", "fire", "vandalism"]),
            )
            .with_policy("POL003", terms(dec!(250), dec!(25000), &["collision", "hail"]))
    }

    /// Parses a table from JSON
    ///
    /// ```json
    /// {
    ///   "currency": "USD",
    ///   "default": { "deductible": 500, "coverage_limit": 50000, "covered_damage_types": ["collision"] },
    ///   "policies": { "POL001": { "deductible": 500, "coverage_limit": 50000, "covered_damage_types": ["hail"] } }
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Parse` for malformed JSON and
    /// `PolicyError::InvalidTerms` for negative amounts or blank keywords.
    pub fn from_json_str(json: &str) -> Result<Self, PolicyError> {
        let file: PolicyTableFile = serde_json::from_str(json)?;
        let currency = file.currency.unwrap_or_default();

        let mut table = Self::new(file.default.into_terms("DEFAULT", currency)?);
        for (policy_id, entry) in file.policies {
            let terms = entry.into_terms(&policy_id, currency)?;
            table.policies.insert(policy_id, terms);
        }
        Ok(table)
    }

    /// Loads a table from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_json_str(&json)?;
        info!(path = %path.display(), policies = table.len(), "Loaded policy table");
        Ok(table)
    }

    /// Number of registered policies (the default is not counted)
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Returns true when no policy is registered
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Returns true when the policy id is registered
    pub fn contains(&self, policy_id: &str) -> bool {
        self.policies.contains_key(policy_id)
    }

    /// The terms substituted for unknown policy ids
    pub fn default_terms(&self) -> &PolicyTerms {
        &self.default_terms
    }

    /// The active coverage matching mode
    pub fn matching(&self) -> CoverageMatch {
        self.matching
    }

    /// Looks up a policy and decides coverage for a damage type
    ///
    /// Never fails: an unknown policy id is answered with the default
    /// terms and the record's `source` is `PolicySource::Default`.
    pub fn lookup(&self, policy_id: &str, damage_type: &str) -> PolicyRecord {
        let (terms, source) = match self.policies.get(policy_id) {
            Some(terms) => (terms, PolicySource::Registered),
            None => {
                warn!(policy_id = %policy_id, "Unknown policy id, using default policy terms");
                (&self.default_terms, PolicySource::Default)
            }
        };

        let is_covered = self.matching.is_covered(damage_type, &terms.covered_damage_types);
        debug!(policy_id = %policy_id, damage_type = %damage_type, is_covered, "Coverage decided");

        PolicyRecord {
            policy_id: policy_id.to_string(),
            deductible: terms.deductible,
            coverage_limit: terms.coverage_limit,
            covered_damage_types: terms.covered_damage_types.clone(),
            is_covered,
            coverage_details: coverage_details(damage_type, is_covered),
            source,
        }
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Deserialize)]
struct PolicyTableFile {
    #[serde(default)]
    currency: Option<Currency>,
    default: PolicyTermsEntry,
    #[serde(default)]
    policies: HashMap<String, PolicyTermsEntry>,
}

#[derive(Debug, Deserialize)]
struct PolicyTermsEntry {
    deductible: Decimal,
    coverage_limit: Decimal,
    covered_damage_types: Vec<String>,
}

impl PolicyTermsEntry {
    fn into_terms(self, policy_id: &str, currency: Currency) -> Result<PolicyTerms, PolicyError> {
        PolicyTerms::new(
            policy_id,
            self.deductible,
            self.coverage_limit,
            currency,
            self.covered_damage_types,
        )
    }
}
