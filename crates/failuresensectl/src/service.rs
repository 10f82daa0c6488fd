//! Prediction service client
//!
//! `PredictionService` is the seam between the assessor and the network.
//! Production code uses `HttpPredictionService`; tests use `FakePredictionService`
//! with scripted outcomes.

use async_trait::async_trait;
use failuresense_shared::{AssessmentError, PredictionRequest, PredictionResult};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ServiceConfig;

/// Issues a single prediction call
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, AssessmentError>;

    /// Where requests go, for diagnostics
    fn endpoint(&self) -> &str;
}

// ============================================================================
// HTTP Prediction Service (Production)
// ============================================================================

pub struct HttpPredictionService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPredictionService {
    pub fn new(config: &ServiceConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, AssessmentError> {
        debug!("POST {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!("Prediction service unreachable at {}: {}", self.endpoint, e);
                AssessmentError::Connectivity {
                    detail: if e.is_timeout() {
                        "request timed out".to_string()
                    } else {
                        e.to_string()
                    },
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Prediction service returned {}: {}", status, body);
            return Err(AssessmentError::Service {
                status: status.as_u16(),
                detail: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            });
        }

        // Body read failures after a 2xx are transport problems, not bad JSON
        let body = response.bytes().await.map_err(|e| {
            warn!("Failed to read prediction response body: {}", e);
            AssessmentError::Connectivity {
                detail: e.to_string(),
            }
        })?;

        PredictionResult::from_json(&body).map_err(|e| {
            warn!("Unparseable prediction response: {}", e);
            e
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// ============================================================================
// Fake Prediction Service (Testing)
// ============================================================================

/// Scripted service for tests. Outcomes are returned in order; once the
/// script runs out the fallback outcome repeats.
pub struct FakePredictionService {
    script: Mutex<VecDeque<Result<PredictionResult, AssessmentError>>>,
    fallback: Result<PredictionResult, AssessmentError>,
    delay: Option<Duration>,
    calls: Mutex<Vec<PredictionRequest>>,
}

impl FakePredictionService {
    pub fn new(fallback: Result<PredictionResult, AssessmentError>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A service whose every call fails to connect
    pub fn unreachable() -> Self {
        Self::new(Err(AssessmentError::Connectivity {
            detail: "connection refused".to_string(),
        }))
    }

    /// Queue an outcome ahead of the fallback
    pub fn then(self, outcome: Result<PredictionResult, AssessmentError>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(outcome);
        }
        self
    }

    /// Hold each call for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far
    pub fn calls(&self) -> Vec<PredictionRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl PredictionService for FakePredictionService {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, AssessmentError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        scripted.unwrap_or_else(|| self.fallback.clone())
    }

    fn endpoint(&self) -> &str {
        "fake://prediction"
    }
}
