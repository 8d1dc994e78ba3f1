//! Claims Processing Domain
//!
//! This crate turns a damage photo and a policy identifier into a payout
//! decision by running three strictly ordered steps, then hands the result
//! to optional document and notification collaborators.
//!
//! # Claim Pipeline
//!
//! ```text
//! validate -> classify -> policy lookup -> payout -> assemble -> [render] -> [notify]
//! ```
//!
//! Failures before assembly abort the claim. Rendering and notification
//! failures are reported on the record, never raised.

pub mod assessment;
pub mod payout;
pub mod classifier;
pub mod claim;
pub mod document;
pub mod notification;
pub mod ports;
pub mod orchestrator;
pub mod error;

pub use assessment::{DamageAssessment, Severity};
pub use payout::{calculate, PayoutDecision, PayoutStatus};
pub use classifier::{Classifier, ClassifierKind, ImageReference, KeywordMockClassifier, RandomMockClassifier};
pub use claim::ClaimRecord;
pub use document::{ClaimDocument, DocumentLine, DocumentSection};
pub use notification::{ChannelOutcome, NotificationMessage, NotificationReport};
pub use ports::{DocumentReference, DocumentStore, Notifier, StoredDocument};
pub use orchestrator::{ClaimOrchestrator, ClaimOutcome};
pub use error::ClaimError;
