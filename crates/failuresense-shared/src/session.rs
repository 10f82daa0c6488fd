//! Assessment session: one request at a time against the prediction service.
//!
//! The session is a plain state machine. It performs no I/O; a driver calls
//! `begin()` before issuing the request and `settle()` with the outcome.
//!
//! ```text
//! Idle       --begin-->  Submitting
//! Submitting --settle--> Success | Failure
//! Success    --begin-->  Submitting   (prior result cleared)
//! Failure    --begin-->  Submitting   (prior error cleared)
//! ```

use crate::error::AssessmentError;
use crate::prediction::PredictionResult;
use crate::severity::SeverityTier;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Identifies one submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

impl SubmissionTicket {
    pub fn attempt(&self) -> u64 {
        self.0
    }
}

/// Successful assessment with its derived tier
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub result: PredictionResult,
    pub tier: SeverityTier,
    pub settled_at: DateTime<Utc>,
}

impl Assessment {
    pub fn new(result: PredictionResult) -> Self {
        let tier = result.tier();
        Self {
            result,
            tier,
            settled_at: Utc::now(),
        }
    }

    pub fn score_display(&self) -> String {
        self.result.score_display()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Submitting { ticket: SubmissionTicket },
    Success(Assessment),
    Failure(AssessmentError),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Submitting { .. } => "submitting",
            SessionState::Success(_) => "success",
            SessionState::Failure(_) => "failure",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssessmentSession {
    state: SessionState,
    attempts: u64,
    discarded: bool,
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AssessmentSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            attempts: 0,
            discarded: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SessionState::Submitting { .. })
    }

    pub fn is_discarded(&self) -> bool {
        self.discarded
    }

    pub fn assessment(&self) -> Option<&Assessment> {
        match &self.state {
            SessionState::Success(assessment) => Some(assessment),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AssessmentError> {
        match &self.state {
            SessionState::Failure(err) => Some(err),
            _ => None,
        }
    }

    /// Start an attempt. Returns `None` while another attempt is in flight
    /// or after the session was discarded; the state is left untouched.
    pub fn begin(&mut self) -> Option<SubmissionTicket> {
        if self.discarded {
            debug!("Submission ignored: session discarded");
            return None;
        }
        if let SessionState::Submitting { ticket } = self.state {
            debug!("Submission rejected: attempt {} still in flight", ticket.0);
            return None;
        }

        self.attempts += 1;
        let ticket = SubmissionTicket(self.attempts);
        self.state = SessionState::Submitting { ticket };
        debug!("Session submitting (attempt {})", ticket.0);
        Some(ticket)
    }

    /// Apply the outcome of an attempt. Outcomes for any ticket other than
    /// the in-flight one are dropped, as are outcomes after `discard()`.
    pub fn settle(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<PredictionResult, AssessmentError>,
    ) -> bool {
        if self.discarded {
            debug!("Dropping outcome of attempt {}: session discarded", ticket.0);
            return false;
        }
        match self.state {
            SessionState::Submitting { ticket: current } if current == ticket => {}
            _ => {
                debug!("Dropping stale outcome of attempt {}", ticket.0);
                return false;
            }
        }

        self.state = match outcome {
            Ok(result) => SessionState::Success(Assessment::new(result)),
            Err(err) => SessionState::Failure(err),
        };
        debug!("Session settled: {}", self.state.name());
        true
    }

    /// Dispose of the session. Late outcomes are ignored from here on.
    pub fn discard(&mut self) {
        self.discarded = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_are_unique_per_attempt() {
        let mut session = AssessmentSession::new();
        let first = session.begin().unwrap();
        assert!(session.settle(first, Ok(PredictionResult::default())));
        let second = session.begin().unwrap();
        assert_ne!(first, second);
        assert_eq!(second.attempt(), 2);
    }

    #[test]
    fn test_discarded_session_refuses_new_attempts() {
        let mut session = AssessmentSession::new();
        session.discard();
        assert!(session.begin().is_none());
        assert_eq!(session.state(), &SessionState::Idle);
    }
}
