//! Prediction service response.

use crate::error::AssessmentError;
use crate::severity::{self, SeverityTier};
use serde::{Deserialize, Deserializer, Serialize};

/// Sensor flags raised by the service alongside the score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbnormalSensors {
    #[serde(default, deserialize_with = "null_as_false")]
    pub high_tool_wear: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub high_torque: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub high_temp_diff: bool,
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScore {
    Number(f64),
    Text(String),
}

/// Scores arrive as numbers or numeric strings. Text that is not a number
/// counts as no score.
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<RawScore>::deserialize(deserializer)? {
        Some(RawScore::Number(score)) => Some(score),
        Some(RawScore::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

impl AbnormalSensors {
    /// Human-readable description of each raised flag
    pub fn flagged(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.high_tool_wear {
            out.push("tool wear above 200 min");
        }
        if self.high_torque {
            out.push("torque above 50 Nm");
        }
        if self.high_temp_diff {
            out.push("process/air temperature gap above 10 K");
        }
        out
    }
}

/// Risk assessment returned by the service. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub risk_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abnormal_sensors: Option<AbnormalSensors>,
}

impl PredictionResult {
    /// Decode a response body. Anything other than a JSON object is a parse failure.
    pub fn from_json(body: &[u8]) -> Result<Self, AssessmentError> {
        Ok(serde_json::from_slice(body)?)
    }

    pub fn tier(&self) -> SeverityTier {
        severity::classify(self.risk_level.as_deref())
    }

    pub fn score_display(&self) -> String {
        severity::format_score(self.risk_score)
    }

    pub fn level_label(&self) -> String {
        severity::risk_label(self.risk_level.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn test_partial_response_decodes() {
        let result = PredictionResult::from_json(br#"{"risk_level":"MODERATE"}"#).unwrap();
        assert_eq!(result.risk_level.as_deref(), Some("MODERATE"));
        assert_eq!(result.risk_score, None);
        assert_eq!(result.explanation, None);
        assert_eq!(result.tier(), SeverityTier::Medium);
    }

    #[test]
    fn test_full_response_with_sensor_flags() {
        let body = br#"{
            "risk_score": 0.7312,
            "risk_level": "HIGH",
            "abnormal_sensors": {"high_tool_wear": true, "high_torque": false, "high_temp_diff": true},
            "explanation": "The machine is flagged because tool wear is unusually high.",
            "recommendation": "Immediate maintenance recommended: inspect and replace tool."
        }"#;
        let result = PredictionResult::from_json(body).unwrap();
        let sensors = result.abnormal_sensors.clone().unwrap();
        assert_eq!(sensors.flagged().len(), 2);
        assert_eq!(result.score_display(), "73.12%");
        assert_eq!(result.level_label(), "HIGH");
    }

    #[test]
    fn test_non_json_body_is_parse_error() {
        let err = PredictionResult::from_json(b"<html>502</html>").unwrap_err();
        assert_eq!(err.kind(), FailureKind::Parse);

        let err = PredictionResult::from_json(b"[1, 2]").unwrap_err();
        assert_eq!(err.kind(), FailureKind::Parse);
    }

    #[test]
    fn test_string_score_is_accepted() {
        let result =
            PredictionResult::from_json(br#"{"risk_score":"0.73","risk_level":"High"}"#).unwrap();
        assert_eq!(result.risk_score, Some(0.73));
        assert_eq!(result.score_display(), "73.00%");

        let result = PredictionResult::from_json(br#"{"risk_score":"pending","risk_level":"Low"}"#)
            .unwrap();
        assert_eq!(result.score_display(), "N/A");
        assert_eq!(result.level_label(), "LOW");

        let result = PredictionResult::from_json(br#"{"risk_score":null}"#).unwrap();
        assert_eq!(result.risk_score, None);
    }

    #[test]
    fn test_null_sensor_flags_read_as_clear() {
        let body = br#"{
            "risk_level": "HIGH",
            "abnormal_sensors": {"high_tool_wear": true, "high_torque": null}
        }"#;
        let result = PredictionResult::from_json(body).unwrap();
        let sensors = result.abnormal_sensors.unwrap();
        assert!(sensors.high_tool_wear);
        assert!(!sensors.high_torque);
        assert_eq!(sensors.flagged(), vec!["tool wear above 200 min"]);

        let result = PredictionResult::from_json(br#"{"abnormal_sensors":null}"#).unwrap();
        assert_eq!(result.abnormal_sensors, None);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let result = PredictionResult::from_json(br#"{"model_version":"2.0"}"#).unwrap();
        assert_eq!(result, PredictionResult::default());
    }
}
