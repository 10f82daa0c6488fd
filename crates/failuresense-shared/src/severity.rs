//! Severity tiers derived from the service's free-form risk label.
//!
//! The service does not enumerate its labels, so classification is an
//! ordered substring rule list. The first matching rule wins, which makes
//! "HIGH-MODERATE" a high-tier result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display bucket for a risk assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Low,
    Medium,
    High,
}

impl SeverityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Low => "LOW",
            SeverityTier::Medium => "MEDIUM",
            SeverityTier::High => "HIGH",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered classification rules: (tier, any of these substrings)
const RULES: &[(SeverityTier, &[&str])] = &[
    (SeverityTier::High, &["high"]),
    (SeverityTier::Medium, &["medium", "moderate"]),
];

/// Classify a risk label. An absent label signals no elevated risk.
pub fn classify(risk_level: Option<&str>) -> SeverityTier {
    let Some(level) = risk_level else {
        return SeverityTier::Low;
    };
    let level = level.to_lowercase();

    RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| level.contains(needle)))
        .map(|(tier, _)| *tier)
        .unwrap_or(SeverityTier::Low)
}

/// Render a failure probability as a percentage.
///
/// Zero is rendered as "N/A", the same as an absent score.
pub fn format_score(risk_score: Option<f64>) -> String {
    match risk_score {
        Some(score) if score != 0.0 && !score.is_nan() => format!("{:.2}%", score * 100.0),
        _ => "N/A".to_string(),
    }
}

/// Badge text for a risk label
pub fn risk_label(risk_level: Option<&str>) -> String {
    match risk_level {
        Some(level) if !level.is_empty() => level.to_uppercase(),
        _ => "UNKNOWN".to_string(),
    }
}
