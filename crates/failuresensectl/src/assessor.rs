//! Assessor - drives an assessment session against a prediction service
//!
//! The session sits behind a mutex that is never held across the network
//! call. While a request is in flight the assessor keeps only a weak
//! reference, so a session dropped by its owner never receives the late
//! response.

use failuresense_shared::{
    AssessmentSession, PredictionRequest, SessionState, SubmissionTicket,
};
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, Instrument};

use crate::service::PredictionService;

/// What happened to a `submit()` call
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The session settled; the payload is its new state
    Settled(SessionState),
    /// Another submission was already in flight; nothing was sent
    Rejected,
    /// The session was discarded before the response arrived
    Discarded,
}

pub struct Assessor<S: PredictionService> {
    service: Arc<S>,
    session: Arc<Mutex<AssessmentSession>>,
}

impl<S: PredictionService> Clone for Assessor<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            session: Arc::clone(&self.session),
        }
    }
}

impl<S: PredictionService> Assessor<S> {
    pub fn new(service: S) -> Self {
        Self::with_service(Arc::new(service))
    }

    pub fn with_service(service: Arc<S>) -> Self {
        Self {
            service,
            session: Arc::new(Mutex::new(AssessmentSession::new())),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Snapshot of the current session state
    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state().clone()
    }

    pub async fn is_submitting(&self) -> bool {
        self.session.lock().await.is_submitting()
    }

    /// Dispose of the session. An in-flight response will be ignored.
    pub async fn discard(&self) {
        self.session.lock().await.discard();
    }

    /// Submit one reading and wait for the session to settle. Rejected
    /// without network activity when a submission is already in flight.
    pub async fn submit(&self, request: PredictionRequest) -> SubmitOutcome {
        let Some(ticket) = self.session.lock().await.begin() else {
            return SubmitOutcome::Rejected;
        };
        run_submission(
            Arc::clone(&self.service),
            Arc::downgrade(&self.session),
            ticket,
            request,
        )
        .await
    }
}

impl<S: PredictionService + 'static> Assessor<S> {
    /// Start a submission on a background task, the way an event loop fires
    /// a request and keeps handling input. Returns `None` when rejected.
    pub async fn spawn_submit(
        &self,
        request: PredictionRequest,
    ) -> Option<JoinHandle<SubmitOutcome>> {
        let ticket = self.session.lock().await.begin()?;
        Some(tokio::spawn(run_submission(
            Arc::clone(&self.service),
            Arc::downgrade(&self.session),
            ticket,
            request,
        )))
    }
}

async fn run_submission<S: PredictionService>(
    service: Arc<S>,
    session: Weak<Mutex<AssessmentSession>>,
    ticket: SubmissionTicket,
    request: PredictionRequest,
) -> SubmitOutcome {
    let span = tracing::info_span!(
        "submission",
        submission_id = %uuid::Uuid::new_v4(),
        attempt = ticket.attempt()
    );

    async move {
        info!(
            "Submitting reading (machine type {}) to {}",
            request.machine_type,
            service.endpoint()
        );
        let outcome = service.predict(&request).await;

        let Some(handle) = session.upgrade() else {
            debug!("Session dropped while request was in flight");
            return SubmitOutcome::Discarded;
        };
        let mut session = handle.lock().await;
        if session.settle(ticket, outcome) {
            SubmitOutcome::Settled(session.state().clone())
        } else {
            SubmitOutcome::Discarded
        }
    }
    .instrument(span)
    .await
}
