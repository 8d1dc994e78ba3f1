//! Coverage terms and damage-type matching
//!
//! A policy covers a set of damage keywords. Whether a classified damage
//! type falls under one of them is decided by a `CoverageMatch` mode,
//! always case-insensitively.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money};
use crate::error::PolicyError;

/// How a damage type is matched against the covered keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageMatch {
    /// Covered when the damage type contains a covered keyword
    /// ("Major Frontal Collision" is covered by "collision")
    #[default]
    Substring,
    /// Covered only when the damage type equals a covered keyword
    Exact,
}

impl CoverageMatch {
    /// Tests one damage type against one covered keyword
    ///
    /// `keyword` is expected to be lowercase already.
    pub fn matches(&self, damage_type: &str, keyword: &str) -> bool {
        let damage = damage_type.trim().to_lowercase();
        if damage.is_empty() || keyword.is_empty() {
            return false;
        }
        match self {
            CoverageMatch::Substring => damage.contains(keyword),
            CoverageMatch::Exact => damage == keyword,
        }
    }

    /// Tests a damage type against a set of covered keywords
    pub fn is_covered(&self, damage_type: &str, covered: &BTreeSet<String>) -> bool {
        covered.iter().any(|keyword| self.matches(damage_type, keyword))
    }
}

impl std::str::FromStr for CoverageMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substring" => Ok(CoverageMatch::Substring),
            "exact" => Ok(CoverageMatch::Exact),
            other => Err(format!("unknown coverage match mode '{}'", other)),
        }
    }
}

/// The financial terms of one policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTerms {
    /// Amount subtracted from the estimate before payout
    pub deductible: Money,
    /// Payout ceiling per claim
    pub coverage_limit: Money,
    /// Lowercased covered damage keywords
    pub covered_damage_types: BTreeSet<String>,
}

impl PolicyTerms {
    /// Builds validated terms
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::InvalidTerms` when the deductible or limit is
    /// negative or a covered keyword is blank.
    pub fn new<I, S>(
        policy_id: &str,
        deductible: Decimal,
        coverage_limit: Decimal,
        currency: Currency,
        covered: I,
    ) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let deductible = Money::non_negative(deductible, currency)
            .map_err(|e| PolicyError::invalid_terms(policy_id, format!("deductible: {}", e)))?;
        let coverage_limit = Money::non_negative(coverage_limit, currency)
            .map_err(|e| PolicyError::invalid_terms(policy_id, format!("coverage limit: {}", e)))?;

        let mut covered_damage_types = BTreeSet::new();
        for keyword in covered {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if keyword.is_empty() {
                return Err(PolicyError::invalid_terms(policy_id, "blank covered damage type"));
            }
            covered_damage_types.insert(keyword);
        }

        Ok(Self {
            deductible,
            coverage_limit,
            covered_damage_types,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn keywords(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_substring_is_case_insensitive() {
        let covered = keywords(&["collision", "hail"]);
        assert!(CoverageMatch::Substring.is_covered("Major Frontal Collision", &covered));
        assert!(CoverageMatch::Substring.is_covered("HAIL", &covered));
        assert!(!CoverageMatch::Substring.is_covered("Paint Scratch", &covered));
    }

    #[test]
    fn test_exact_requires_whole_match() {
        let covered = keywords(&["collision"]);
        assert!(CoverageMatch::Exact.is_covered("Collision", &covered));
        assert!(!CoverageMatch::Exact.is_covered("Major Frontal Collision", &covered));
    }

    #[test]
    fn test_blank_damage_type_is_never_covered() {
        let covered = keywords(&["collision"]);
        assert!(!CoverageMatch::Substring.is_covered("   ", &covered));
    }

    #[test]
    fn test_terms_normalize_keywords() {
        let terms = PolicyTerms::new("P", dec!(1), dec!(2), Currency::USD, [" Fire ", "FLOOD"]).unwrap();
        assert!(terms.covered_damage_types.contains("fire"));
        assert!(terms.covered_damage_types.contains("flood"));
    }

    #[test]
    fn test_terms_reject_negative_deductible() {
        let result = PolicyTerms::new("P", dec!(-1), dec!(2), Currency::USD, ["fire"]);
        assert!(matches!(result, Err(PolicyError::InvalidTerms { .. })));
    }

    #[test]
    fn test_parse_match_mode() {
        assert_eq!("Exact".parse::<CoverageMatch>().unwrap(), CoverageMatch::Exact);
        assert!("fuzzy".parse::<CoverageMatch>().is_err());
    }
}
