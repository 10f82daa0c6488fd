//! Error types for FailureSense.

use crate::telemetry::FormField;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a form field failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationReason {
    /// Numeric field is empty, unparseable, or not finite
    NotANumber,
    /// No machine type selected
    Missing,
    /// Machine type is not one of L, M, H
    Unrecognized,
}

impl ValidationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationReason::NotANumber => "not-a-number",
            ValidationReason::Missing => "missing",
            ValidationReason::Unrecognized => "unrecognized",
        }
    }
}

/// Field-level validation failure, raised before any network activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: FormField,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: FormField, reason: ValidationReason) -> Self {
        Self { field, reason }
    }

    /// Operator-facing message naming the field
    pub fn message(&self) -> String {
        match self.reason {
            ValidationReason::NotANumber => format!("{} must be a number", self.field.label()),
            ValidationReason::Missing => format!("{} is required", self.field.label()),
            ValidationReason::Unrecognized => {
                format!("{} must be one of L, M or H", self.field.label())
            }
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Cause of a failed submission, for callers that branch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Connectivity,
    Service,
    Parse,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Connectivity => "connectivity",
            FailureKind::Service => "service",
            FailureKind::Parse => "parse",
        }
    }
}

pub const CONNECTIVITY_MESSAGE: &str =
    "Failed to connect to the maintenance server. Please check your backend.";

pub const SERVICE_MESSAGE: &str =
    "The maintenance server rejected the request. Please try again.";

/// Failure of a single submission attempt. Never fatal to the session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssessmentError {
    #[error("Prediction service unreachable: {detail}")]
    Connectivity { detail: String },

    #[error("Prediction service returned {status}: {detail}")]
    Service { status: u16, detail: String },

    #[error("Invalid prediction response: {detail}")]
    Parse { detail: String },
}

impl AssessmentError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AssessmentError::Connectivity { .. } => FailureKind::Connectivity,
            AssessmentError::Service { .. } => FailureKind::Service,
            AssessmentError::Parse { .. } => FailureKind::Parse,
        }
    }

    /// Generic message shown to the operator. Status text and parse
    /// details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            FailureKind::Connectivity => CONNECTIVITY_MESSAGE,
            FailureKind::Service | FailureKind::Parse => SERVICE_MESSAGE,
        }
    }
}

impl From<serde_json::Error> for AssessmentError {
    fn from(e: serde_json::Error) -> Self {
        AssessmentError::Parse {
            detail: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = ValidationError::new(FormField::Torque, ValidationReason::NotANumber);
        assert_eq!(err.to_string(), "Torque must be a number");
        assert_eq!(err.reason.as_str(), "not-a-number");
    }

    #[test]
    fn test_parse_and_service_share_display_message() {
        let parse = AssessmentError::Parse {
            detail: "expected value".to_string(),
        };
        let service = AssessmentError::Service {
            status: 500,
            detail: "Internal Server Error".to_string(),
        };
        assert_eq!(parse.user_message(), service.user_message());
        assert_eq!(
            service.user_message(),
            "The maintenance server rejected the request. Please try again."
        );
        assert_ne!(parse.kind(), service.kind());
    }

    #[test]
    fn test_connectivity_message_is_distinct() {
        let err = AssessmentError::Connectivity {
            detail: "connection refused".to_string(),
        };
        assert_eq!(err.user_message(), CONNECTIVITY_MESSAGE);
        assert_ne!(err.user_message(), SERVICE_MESSAGE);
    }
}
