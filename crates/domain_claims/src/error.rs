//! Claims domain errors

use thiserror::Error;

use core_kernel::{MoneyError, PortError};

/// Errors that can occur in the claims domain
///
/// `Validation`, `ClassificationFailed` and `Payout` abort a claim. `Rendering` and
/// `Notification` are recorded at their boundary and never abort one.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Classification failed: {0}")]
    ClassificationFailed(#[source] PortError),

    /// Cost and policy terms are in different currencies
    #[error("Payout calculation failed: {0}")]
    Payout(#[from] MoneyError),

    #[error("Document rendering failed: {0}")]
    Rendering(#[source] PortError),

    #[error("Notification via {channel} failed: {message}")]
    Notification { channel: String, message: String },
}

impl ClaimError {
    /// Creates a validation error without a field
    pub fn validation(message: impl Into<String>) -> Self {
        ClaimError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a validation error for a specific field
    pub fn validation_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ClaimError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Returns true for errors that abort claim processing
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ClaimError::Validation { .. } | ClaimError::ClassificationFailed(_) | ClaimError::Payout(_)
        )
    }
}
