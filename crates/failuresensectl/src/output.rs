//! Output formatting - ASCII terminal rendering of session state
//!
//! Rendering is split from printing so tests can inspect the text.

use failuresense_shared::{
    Assessment, AssessmentError, FormField, SessionState, SeverityTier, TelemetryForm,
    ValidationError,
};
use owo_colors::OwoColorize;
use serde_json::json;
use std::io::IsTerminal;

use crate::config::{ColorMode, OutputConfig, OutputFormat};

const SEPARATOR: &str = "----------------------------------------";

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
    format: OutputFormat,
}

impl Renderer {
    pub fn new(color: bool, format: OutputFormat) -> Self {
        Self { color, format }
    }

    /// Resolve color support from config and the terminal
    pub fn from_config(output: &OutputConfig) -> Self {
        let color = match output.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
            }
        };
        Self::new(color, output.format)
    }

    pub fn plain() -> Self {
        Self::new(false, OutputFormat::Text)
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render the session state in the configured format
    pub fn render_state(&self, state: &SessionState) -> String {
        match self.format {
            OutputFormat::Text => self.state_text(state),
            OutputFormat::Json => state_json(state).to_string(),
        }
    }

    pub fn render_validation(&self, errors: &[ValidationError]) -> String {
        match self.format {
            OutputFormat::Text => {
                let mut out = String::new();
                for err in errors {
                    out.push_str(&format!("{} {}\n", self.paint_error("[INVALID]"), err));
                }
                out
            }
            OutputFormat::Json => json!({
                "status": "invalid",
                "errors": errors.iter().map(|e| json!({
                    "field": e.field,
                    "reason": e.reason.as_str(),
                    "message": e.message(),
                })).collect::<Vec<_>>(),
            })
            .to_string(),
        }
    }

    fn state_text(&self, state: &SessionState) -> String {
        match state {
            SessionState::Idle => "[IDLE] No assessment yet\n".to_string(),
            SessionState::Submitting { .. } => "[BUSY] Analyzing telemetry...\n".to_string(),
            SessionState::Success(assessment) => self.assessment_text(assessment),
            SessionState::Failure(err) => self.failure_text(err),
        }
    }

    fn assessment_text(&self, assessment: &Assessment) -> String {
        let result = &assessment.result;
        let mut out = String::new();

        out.push_str(SEPARATOR);
        out.push('\n');
        out.push_str(&format!(
            "{}  Risk level: {}\n",
            self.paint_tier(&format!("[{}]", assessment.tier), assessment.tier),
            result.level_label()
        ));
        out.push_str(&format!(
            "Failure probability: {}\n",
            assessment.score_display()
        ));

        if let Some(sensors) = &result.abnormal_sensors {
            let flagged = sensors.flagged();
            if !flagged.is_empty() {
                out.push_str("\n[ABNORMAL SENSORS]\n");
                for flag in flagged {
                    out.push_str(&format!("  * {}\n", flag));
                }
            }
        }

        if let Some(explanation) = &result.explanation {
            out.push_str(&format!("\n[EXPLANATION]\n  {}\n", explanation));
        }
        if let Some(recommendation) = &result.recommendation {
            out.push_str(&format!("\n[RECOMMENDATION]\n  {}\n", recommendation));
        }

        out.push_str(SEPARATOR);
        out.push('\n');
        out
    }

    fn failure_text(&self, err: &AssessmentError) -> String {
        format!("{} {}\n", self.paint_error("[ERROR]"), err.user_message())
    }

    /// Current form contents, one line per field
    pub fn render_form(&self, form: &TelemetryForm) -> String {
        let mut out = String::new();
        for field in FormField::ALL {
            let raw = form.raw(field);
            let value = if raw.is_empty() {
                match field.placeholder() {
                    Some(hint) => format!("(empty, e.g. {})", hint),
                    None => "(empty, one of L/M/H)".to_string(),
                }
            } else {
                raw.to_string()
            };
            let unit = field.unit().map(|u| format!(" {}", u)).unwrap_or_default();
            let marker = if form.is_dirty(field) { "*" } else { " " };
            out.push_str(&format!(
                "{} {:<20} {}{}\n",
                marker,
                field.label(),
                value,
                if raw.is_empty() { "" } else { unit.as_str() }
            ));
        }
        out
    }

    fn paint_tier(&self, text: &str, tier: SeverityTier) -> String {
        if !self.color {
            return text.to_string();
        }
        match tier {
            SeverityTier::High => text.bright_red().bold().to_string(),
            SeverityTier::Medium => text.yellow().to_string(),
            SeverityTier::Low => text.bright_green().to_string(),
        }
    }

    fn paint_error(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}

/// JSON view of the session state
pub fn state_json(state: &SessionState) -> serde_json::Value {
    match state {
        SessionState::Idle => json!({ "status": "idle" }),
        SessionState::Submitting { ticket } => json!({
            "status": "submitting",
            "attempt": ticket.attempt(),
        }),
        SessionState::Success(assessment) => json!({
            "status": "success",
            "severity": assessment.tier,
            "risk_label": assessment.result.level_label(),
            "score": assessment.score_display(),
            "settled_at": assessment.settled_at.to_rfc3339(),
            "result": assessment.result,
        }),
        SessionState::Failure(err) => json!({
            "status": "failure",
            "kind": err.kind(),
            "message": err.user_message(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use failuresense_shared::{AbnormalSensors, PredictionResult};

    fn high_assessment() -> Assessment {
        Assessment::new(PredictionResult {
            risk_level: Some("High".to_string()),
            risk_score: Some(0.8734),
            explanation: Some("Torque levels are abnormally high.".to_string()),
            recommendation: None,
            abnormal_sensors: Some(AbnormalSensors {
                high_torque: true,
                ..Default::default()
            }),
        })
    }

    #[test]
    fn test_success_text() {
        let text = Renderer::plain().render_state(&SessionState::Success(high_assessment()));
        assert!(text.contains("[HIGH]  Risk level: HIGH"));
        assert!(text.contains("Failure probability: 87.34%"));
        assert!(text.contains("torque above 50 Nm"));
        assert!(text.contains("[EXPLANATION]"));
        assert!(!text.contains("[RECOMMENDATION]"));
    }

    #[test]
    fn test_sparse_result_degrades() {
        let assessment = Assessment::new(PredictionResult::default());
        let text = Renderer::plain().render_state(&SessionState::Success(assessment));
        assert!(text.contains("[LOW]  Risk level: UNKNOWN"));
        assert!(text.contains("Failure probability: N/A"));
        assert!(!text.contains("[EXPLANATION]"));
    }

    #[test]
    fn test_failure_text_hides_detail() {
        let err = AssessmentError::Service {
            status: 500,
            detail: "Internal Server Error".to_string(),
        };
        let text = Renderer::plain().render_state(&SessionState::Failure(err));
        assert!(text.starts_with("[ERROR]"));
        assert!(!text.contains("500"));
    }

    #[test]
    fn test_json_failure() {
        let err = AssessmentError::Connectivity {
            detail: "refused".to_string(),
        };
        let value = state_json(&SessionState::Failure(err));
        assert_eq!(value["status"], "failure");
        assert_eq!(value["kind"], "connectivity");
    }

    #[test]
    fn test_json_success() {
        let value = state_json(&SessionState::Success(high_assessment()));
        assert_eq!(value["severity"], "high");
        assert_eq!(value["score"], "87.34%");
        assert_eq!(value["result"]["risk_score"], 0.8734);
        assert!(value["result"].get("recommendation").is_none());
    }

    #[test]
    fn test_form_listing() {
        let mut form = TelemetryForm::new();
        form.set_field(FormField::Torque, "40.0");
        let text = Renderer::plain().render_form(&form);
        assert!(text.contains("* Torque"));
        assert!(text.contains("40.0 Nm"));
        assert!(text.contains("(empty, e.g. 298.0)"));
        assert_eq!(text.lines().count(), 6);
    }
}
