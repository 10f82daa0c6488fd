//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Args, Parser, Subcommand, ValueEnum};
use failuresense_shared::{FormField, TelemetryForm};

use crate::config::{ClientConfig, ColorMode};

/// FailureSense client
#[derive(Parser, Debug)]
#[command(name = "failuresensectl")]
#[command(about = "FailureSense - submit machine telemetry for failure risk assessment", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Prediction endpoint URL (overrides config and $FAILURESENSE_ENDPOINT)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output JSON only
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorArg>,

    /// Debug logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assess a single telemetry reading
    Assess(ReadingArgs),

    /// Fill in the reading field by field and resubmit as needed
    Interactive,

    /// Show or change configuration
    Config {
        /// Set a configuration value (key=value)
        #[arg(long)]
        set: Option<String>,
    },
}

/// Raw field values. Validation happens when the request is built, so
/// every problem is reported at once.
#[derive(Args, Debug, Default)]
pub struct ReadingArgs {
    /// Air temperature [K], e.g. 298.0
    #[arg(long, allow_hyphen_values = true)]
    pub air_temp: Option<String>,

    /// Process temperature [K], e.g. 308.0
    #[arg(long, allow_hyphen_values = true)]
    pub process_temp: Option<String>,

    /// Rotational speed [rpm], e.g. 1500
    #[arg(long, allow_hyphen_values = true)]
    pub rotational_speed: Option<String>,

    /// Torque [Nm], e.g. 40.0
    #[arg(long, allow_hyphen_values = true)]
    pub torque: Option<String>,

    /// Tool wear [min], e.g. 0
    #[arg(long, allow_hyphen_values = true)]
    pub tool_wear: Option<String>,

    /// Machine type: L, M or H
    #[arg(long)]
    pub machine_type: Option<String>,
}

impl ReadingArgs {
    pub fn to_form(&self) -> TelemetryForm {
        let mut form = TelemetryForm::new();
        let values = [
            (FormField::AirTemperature, &self.air_temp),
            (FormField::ProcessTemperature, &self.process_temp),
            (FormField::RotationalSpeed, &self.rotational_speed),
            (FormField::Torque, &self.torque),
            (FormField::ToolWear, &self.tool_wear),
            (FormField::MachineType, &self.machine_type),
        ];
        for (field, value) in values {
            if let Some(raw) = value {
                form.set_field(field, raw.as_str());
            }
        }
        form
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

impl Cli {
    /// Apply global flags on top of the loaded config
    pub fn apply_overrides(&self, config: &mut ClientConfig) -> anyhow::Result<()> {
        if let Some(endpoint) = &self.endpoint {
            config.set("endpoint", endpoint)?;
        }
        if let Some(timeout) = self.timeout {
            config.set("timeout", &timeout.to_string())?;
        }
        if self.json {
            config.set("format", "json")?;
        }
        if let Some(color) = self.color {
            config.output.color = match color {
                ColorArg::Auto => ColorMode::Auto,
                ColorArg::Always => ColorMode::Always,
                ColorArg::Never => ColorMode::Never,
            };
        }
        Ok(())
    }
}
