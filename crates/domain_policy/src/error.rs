//! Policy domain errors
//!
//! Lookups never fail; these errors only arise while building or loading
//! the policy table at startup.

use thiserror::Error;

/// Errors that can occur in the policy domain
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Invalid policy terms (negative amounts, empty keywords)
    #[error("Invalid policy terms for {policy_id}: {reason}")]
    InvalidTerms {
        policy_id: String,
        reason: String,
    },

    /// The policy table file could not be read
    #[error("Failed to read policy table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The policy table file is not valid JSON for the expected shape
    #[error("Failed to parse policy table: {0}")]
    Parse(#[from] serde_json::Error),
}

impl PolicyError {
    /// Creates an invalid terms error
    pub fn invalid_terms(policy_id: impl Into<String>, reason: impl Into<String>) -> Self {
        PolicyError::InvalidTerms {
            policy_id: policy_id.into(),
            reason: reason.into(),
        }
    }
}
