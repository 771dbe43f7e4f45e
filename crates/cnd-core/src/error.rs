//! # Error Hierarchy
//!
//! Structured error types for the CND monitor, built with `thiserror`.
//!
//! [`CndError`] is the error every collaborator call resolves to at the
//! view boundary. Transport-specific errors (HTTP status codes, decoding
//! failures) are folded into [`CndError::Backend`] by the client crate so
//! the panel only ever has to turn one type into a notification.

use thiserror::Error;

/// Top-level error type for the CND monitor.
#[derive(Error, Debug)]
pub enum CndError {
    /// Domain value validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The referenced record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The operation conflicts with existing state (e.g. duplicate taxpayer
    /// id for the same jurisdiction).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An external collaborator rejected the call or could not be reached.
    #[error("{operation} failed: {message}")]
    Backend {
        /// The collaborator operation that failed (e.g. "delete records").
        operation: String,
        /// Human-readable failure message.
        message: String,
    },

    /// An external collaborator did not answer within the configured timeout.
    #[error("{operation} timed out after {after_ms}ms")]
    Timeout {
        /// The collaborator operation that timed out.
        operation: String,
        /// The timeout that elapsed, in milliseconds.
        after_ms: u64,
    },

    /// The operation was refused because an identical call is still in flight.
    #[error("operation already in progress: {0}")]
    InFlight(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CndError {
    /// Build a [`CndError::Backend`] for the given operation.
    pub fn backend(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Validation errors for domain values.
///
/// Each variant carries the offending input so that the message shown to the
/// user identifies exactly which value was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Taxpayer id does not contain exactly 14 digits.
    #[error("invalid taxpayer id: \"{0}\" (expected 14 digits, optionally as NN.NNN.NNN/NNNN-NN)")]
    InvalidTaxpayerId(String),

    /// Record identifier is empty.
    #[error("invalid record id: must be non-empty")]
    EmptyRecordId,

    /// Date string is not a calendar date.
    #[error("invalid {field}: \"{value}\" (expected YYYY-MM-DD)")]
    InvalidDate {
        /// Which field held the value.
        field: &'static str,
        /// The string that failed to parse.
        value: String,
    },

    /// Expiry date precedes issue date.
    #[error("expiry date {expiry} is before issue date {issue}")]
    ExpiryBeforeIssue {
        /// The issue date as entered.
        issue: String,
        /// The expiry date as entered.
        expiry: String,
    },

    /// A required text field is empty.
    #[error("{0} must not be empty")]
    MissingField(&'static str),

    /// The field cannot change once the record exists.
    #[error("{0} cannot be changed on an existing record")]
    ImmutableField(&'static str),

    /// Jurisdiction code is not one of FED, EST, MUN.
    #[error("unknown jurisdiction: \"{0}\"")]
    UnknownJurisdiction(String),

    /// Clearance status text is not recognized.
    #[error("unknown clearance status: \"{0}\"")]
    UnknownClearanceStatus(String),

    /// Processing status text is not recognized.
    #[error("unknown processing status: \"{0}\"")]
    UnknownProcessingStatus(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_names_operation() {
        let err = CndError::backend("delete records", "service unavailable");
        let msg = err.to_string();
        assert!(msg.contains("delete records"));
        assert!(msg.contains("service unavailable"));
    }

    #[test]
    fn timeout_error_carries_duration() {
        let err = CndError::Timeout {
            operation: "load records".into(),
            after_ms: 1500,
        };
        assert_eq!(err.to_string(), "load records timed out after 1500ms");
    }

    #[test]
    fn validation_converts_into_cnd_error() {
        let err: CndError = ValidationError::EmptyRecordId.into();
        assert!(matches!(err, CndError::Validation(_)));
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn expiry_before_issue_display() {
        let err = ValidationError::ExpiryBeforeIssue {
            issue: "2024-07-15".into(),
            expiry: "2024-01-15".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2024-07-15"));
        assert!(msg.contains("2024-01-15"));
    }

    #[test]
    fn invalid_taxpayer_id_mentions_mask() {
        let err = ValidationError::InvalidTaxpayerId("123".into());
        assert!(err.to_string().contains("NN.NNN.NNN/NNNN-NN"));
    }
}
