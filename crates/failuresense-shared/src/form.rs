//! Telemetry form controller.
//!
//! Holds the raw text of each field while the operator edits it, and only
//! coerces to numbers when a request is built. Intermediate invalid input
//! is therefore always representable.

use crate::error::{ValidationError, ValidationReason};
use crate::telemetry::{FieldKind, FormField, MachineType, PredictionRequest};
use std::collections::{BTreeMap, BTreeSet};

/// Editable telemetry reading
#[derive(Debug, Clone, Default)]
pub struct TelemetryForm {
    values: BTreeMap<FormField, String>,
    dirty: BTreeSet<FormField>,
}

impl TelemetryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text verbatim and mark the field dirty
    pub fn set_field(&mut self, field: FormField, raw: impl Into<String>) {
        self.values.insert(field, raw.into());
        self.dirty.insert(field);
    }

    /// Current raw text, empty if never set
    pub fn raw(&self, field: FormField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn is_dirty(&self, field: FormField) -> bool {
        self.dirty.contains(&field)
    }

    /// Reset every field to empty and clean
    pub fn clear(&mut self) {
        self.values.clear();
        self.dirty.clear();
    }

    /// Build the wire request, failing on the first invalid field in form order
    pub fn build_request(&self) -> Result<PredictionRequest, ValidationError> {
        Ok(PredictionRequest {
            air_temp: self.decimal(FormField::AirTemperature)?,
            process_temp: self.decimal(FormField::ProcessTemperature)?,
            rotational_speed: self.integer(FormField::RotationalSpeed)?,
            torque: self.decimal(FormField::Torque)?,
            tool_wear: self.integer(FormField::ToolWear)?,
            machine_type: self.machine_type()?,
        })
    }

    /// Every failing field, in form order
    pub fn validate(&self) -> Vec<ValidationError> {
        FormField::ALL
            .iter()
            .filter_map(|&field| {
                let checked = match field.kind() {
                    FieldKind::Decimal => self.decimal(field).map(|_| ()),
                    FieldKind::Integer => self.integer(field).map(|_| ()),
                    FieldKind::Choice => self.machine_type().map(|_| ()),
                };
                checked.err()
            })
            .collect()
    }

    fn decimal(&self, field: FormField) -> Result<f64, ValidationError> {
        parse_finite(self.raw(field))
            .ok_or_else(|| ValidationError::new(field, ValidationReason::NotANumber))
    }

    /// Integer fields accept fractional text and truncate toward zero
    fn integer(&self, field: FormField) -> Result<i64, ValidationError> {
        self.decimal(field).map(|value| value.trunc() as i64)
    }

    fn machine_type(&self) -> Result<MachineType, ValidationError> {
        let raw = self.raw(FormField::MachineType).trim();
        if raw.is_empty() {
            return Err(ValidationError::new(
                FormField::MachineType,
                ValidationReason::Missing,
            ));
        }
        raw.parse()
            .map_err(|_| ValidationError::new(FormField::MachineType, ValidationReason::Unrecognized))
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
