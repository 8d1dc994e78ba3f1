//! Policy Lookup Domain
//!
//! This crate answers one question for the claims pipeline: given a policy
//! identifier and a classified damage type, what are the policy's terms and
//! is the damage covered?
//!
//! # Components
//!
//! - **PolicyTable**: immutable id → terms map with injected default terms
//! - **PolicyTerms**: deductible, coverage limit and covered damage keywords
//! - **CoverageMatch**: case-insensitive substring (canonical) or exact matching
//! - **PolicyRecord**: the per-claim lookup result
//!
//! # Example
//!
//! ```rust
//! use domain_policy::{PolicyTable, PolicySource};
//!
//! let table = PolicyTable::builtin();
//! let record = table.lookup("POL003", "Vandalism");
//! assert!(!record.is_covered);
//!
//! let fallback = table.lookup("UNKNOWN", "hail");
//! assert_eq!(fallback.source, PolicySource::Default);
//! ```

pub mod coverage;
pub mod record;
pub mod table;
pub mod error;

pub use coverage::{CoverageMatch, PolicyTerms};
pub use record::{PolicyRecord, PolicySource};
pub use table::PolicyTable;
pub use error::PolicyError;
