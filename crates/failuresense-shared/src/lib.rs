//! Shared types for FailureSense: the telemetry form, the assessment
//! session state machine, and severity classification.

pub mod error;
pub mod form;
pub mod prediction;
pub mod session;
pub mod severity;
pub mod telemetry;

pub use error::{AssessmentError, FailureKind, ValidationError, ValidationReason};
pub use form::TelemetryForm;
pub use prediction::{AbnormalSensors, PredictionResult};
pub use session::{Assessment, AssessmentSession, SessionState, SubmissionTicket};
pub use severity::{classify, format_score, risk_label, SeverityTier};
pub use telemetry::{FieldKind, FormField, MachineType, PredictionRequest};
