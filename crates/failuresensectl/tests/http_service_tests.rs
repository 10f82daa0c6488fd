//! HTTP prediction service tests against an in-process stub server.

use axum::{http::StatusCode, routing::post, Json, Router};
use failuresense_shared::error::CONNECTIVITY_MESSAGE;
use failuresense_shared::{
    AssessmentError, FailureKind, MachineType, PredictionRequest, SeverityTier,
};
use failuresensectl::config::ServiceConfig;
use failuresensectl::service::{HttpPredictionService, PredictionService};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn reading() -> PredictionRequest {
    PredictionRequest {
        air_temp: 298.0,
        process_temp: 308.0,
        rotational_speed: 1500,
        torque: 40.0,
        tool_wear: 0,
        machine_type: MachineType::L,
    }
}

/// Serve `router` on an ephemeral port and return the endpoint URL
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/predict", addr)
}

fn service_for(endpoint: String, timeout_secs: u64) -> HttpPredictionService {
    HttpPredictionService::new(&ServiceConfig {
        endpoint,
        timeout_secs,
    })
    .unwrap()
}

#[tokio::test]
async fn test_posts_wire_body_and_decodes_result() {
    let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let seen_by_handler = Arc::clone(&seen);
    let router = Router::new().route(
        "/predict",
        post(move |Json(body): Json<Value>| {
            let seen = Arc::clone(&seen_by_handler);
            async move {
                *seen.lock().unwrap() = Some(body);
                Json(json!({
                    "risk_score": 0.02,
                    "risk_level": "LOW",
                    "abnormal_sensors": {
                        "high_tool_wear": false,
                        "high_torque": false,
                        "high_temp_diff": false
                    },
                    "explanation": "The machine does not show sufficient risk indicators to require further action at this time.",
                    "recommendation": "Continue normal monitoring."
                }))
            }
        }),
    );
    let service = service_for(serve(router).await, 5);

    let result = service.predict(&reading()).await.unwrap();

    assert_eq!(result.tier(), SeverityTier::Low);
    assert_eq!(result.score_display(), "2.00%");
    assert_eq!(result.abnormal_sensors.unwrap().flagged().len(), 0);

    let body = seen.lock().unwrap().clone().expect("handler saw a body");
    assert_eq!(
        body,
        json!({
            "air_temp": 298.0,
            "process_temp": 308.0,
            "rotational_speed": 1500,
            "torque": 40.0,
            "tool_wear": 0,
            "machine_type": "L"
        })
    );
}

#[tokio::test]
async fn test_error_status_is_service_failure() {
    let router = Router::new().route(
        "/predict",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded") }),
    );
    let service = service_for(serve(router).await, 5);

    let err = service.predict(&reading()).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::Service);
    match err {
        AssessmentError::Service { status, .. } => assert_eq!(status, 500),
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_validation_rejection_is_service_failure() {
    let router = Router::new().route(
        "/predict",
        post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"detail": [{"loc": ["body", "machine_type"]}]})),
            )
        }),
    );
    let service = service_for(serve(router).await, 5);

    let err = service.predict(&reading()).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Service);
}

#[tokio::test]
async fn test_non_json_success_body_is_parse_failure() {
    let router = Router::new().route("/predict", post(|| async { "<html>ok</html>" }));
    let service = service_for(serve(router).await, 5);

    let err = service.predict(&reading()).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Parse);
}

#[tokio::test]
async fn test_unreachable_is_connectivity_failure() {
    // Reserve a port, then close it so nothing is listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = service_for(format!("http://{}/predict", addr), 5);
    let err = service.predict(&reading()).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::Connectivity);
    assert_eq!(err.user_message(), CONNECTIVITY_MESSAGE);
}

#[tokio::test]
async fn test_timeout_is_connectivity_failure() {
    let router = Router::new().route(
        "/predict",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"risk_level": "LOW"}))
        }),
    );
    let service = service_for(serve(router).await, 1);

    let err = service.predict(&reading()).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Connectivity);
}
