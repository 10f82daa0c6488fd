//! Telemetry reading fields and the wire request sent to the prediction service.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a form field is coerced at submission time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Decimal,
    Integer,
    Choice,
}

/// The six fields of a telemetry reading, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    AirTemperature,
    ProcessTemperature,
    RotationalSpeed,
    Torque,
    ToolWear,
    MachineType,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::AirTemperature,
        FormField::ProcessTemperature,
        FormField::RotationalSpeed,
        FormField::Torque,
        FormField::ToolWear,
        FormField::MachineType,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::AirTemperature => "Air Temperature",
            FormField::ProcessTemperature => "Process Temperature",
            FormField::RotationalSpeed => "Rotational Speed",
            FormField::Torque => "Torque",
            FormField::ToolWear => "Tool Wear",
            FormField::MachineType => "Machine Type",
        }
    }

    /// Name used in the prediction request body
    pub fn wire_name(&self) -> &'static str {
        match self {
            FormField::AirTemperature => "air_temp",
            FormField::ProcessTemperature => "process_temp",
            FormField::RotationalSpeed => "rotational_speed",
            FormField::Torque => "torque",
            FormField::ToolWear => "tool_wear",
            FormField::MachineType => "machine_type",
        }
    }

    pub fn unit(&self) -> Option<&'static str> {
        match self {
            FormField::AirTemperature | FormField::ProcessTemperature => Some("K"),
            FormField::RotationalSpeed => Some("rpm"),
            FormField::Torque => Some("Nm"),
            FormField::ToolWear => Some("min"),
            FormField::MachineType => None,
        }
    }

    /// Example value shown while a field is empty
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            FormField::AirTemperature => Some("298.0"),
            FormField::ProcessTemperature => Some("308.0"),
            FormField::RotationalSpeed => Some("1500"),
            FormField::Torque => Some("40.0"),
            FormField::ToolWear => Some("0"),
            FormField::MachineType => None,
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FormField::AirTemperature | FormField::ProcessTemperature | FormField::Torque => {
                FieldKind::Decimal
            }
            FormField::RotationalSpeed | FormField::ToolWear => FieldKind::Integer,
            FormField::MachineType => FieldKind::Choice,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FormField {
    type Err = String;

    /// Accepts the form names (short and long) and the wire names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "airTemp" | "airTemperature" | "air_temp" => Ok(FormField::AirTemperature),
            "processTemp" | "processTemperature" | "process_temp" => {
                Ok(FormField::ProcessTemperature)
            }
            "rotSpeed" | "rotationalSpeed" | "rotational_speed" => Ok(FormField::RotationalSpeed),
            "torque" => Ok(FormField::Torque),
            "toolWear" | "tool_wear" => Ok(FormField::ToolWear),
            "machineType" | "machine_type" => Ok(FormField::MachineType),
            other => Err(format!("Unknown field: '{}'", other)),
        }
    }
}

/// Machine quality variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineType {
    L,
    M,
    H,
}

impl MachineType {
    pub fn code(&self) -> &'static str {
        match self {
            MachineType::L => "L",
            MachineType::M => "M",
            MachineType::H => "H",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MachineType::L => "Low Variance",
            MachineType::M => "Medium Variance",
            MachineType::H => "High Variance",
        }
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for MachineType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(MachineType::L),
            "M" => Ok(MachineType::M),
            "H" => Ok(MachineType::H),
            other => Err(format!("Unknown machine type: '{}'", other)),
        }
    }
}

/// Normalized request body for the prediction endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub air_temp: f64,
    pub process_temp: f64,
    pub rotational_speed: i64,
    pub torque: f64,
    pub tool_wear: i64,
    pub machine_type: MachineType,
}
