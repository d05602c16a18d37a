//! Merge precedence between the sensor and inference fetchers.
//!
//! Each poll cycle produces an optional [`SensorReading`] and an optional
//! [`InferenceResult`]. [`Readings`] names the four possible combinations
//! so each case can be handled (and tested) on its own.

use crate::types::{InferenceResult, SensorReading};

/// Moisture assumed when neither upstream produced data.
pub const MOISTURE_WHEN_ABSENT: f64 = 0.0;

/// What a single poll cycle managed to fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Readings {
    Both {
        sensor: SensorReading,
        inference: InferenceResult,
    },
    InferenceOnly(InferenceResult),
    SensorOnly(SensorReading),
    Neither,
}

impl Readings {
    /// Classify the outcome of the two fetches.
    pub fn from_parts(sensor: Option<SensorReading>, inference: Option<InferenceResult>) -> Self {
        match (sensor, inference) {
            (Some(sensor), Some(inference)) => Self::Both { sensor, inference },
            (None, Some(inference)) => Self::InferenceOnly(inference),
            (Some(sensor), None) => Self::SensorOnly(sensor),
            (None, None) => Self::Neither,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Neither)
    }

    /// The inference result, if one was fetched.
    pub fn inference(&self) -> Option<&InferenceResult> {
        match self {
            Self::Both { inference, .. } | Self::InferenceOnly(inference) => Some(inference),
            Self::SensorOnly(_) | Self::Neither => None,
        }
    }

    /// The sensor reading, if one was fetched.
    pub fn sensor(&self) -> Option<&SensorReading> {
        match self {
            Self::Both { sensor, .. } | Self::SensorOnly(sensor) => Some(sensor),
            Self::InferenceOnly(_) | Self::Neither => None,
        }
    }

    /// Soil moisture used for the moisture check.
    ///
    /// Inference moisture wins whenever inference data exists; the sensor
    /// value is used only when inference is absent.
    pub fn effective_moisture(&self) -> f64 {
        match self {
            Self::Both { inference, .. } | Self::InferenceOnly(inference) => {
                inference.soil_moisture
            }
            Self::SensorOnly(sensor) => sensor.soil_moisture,
            Self::Neither => MOISTURE_WHEN_ABSENT,
        }
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Both { .. } => "both",
            Self::InferenceOnly(_) => "inference_only",
            Self::SensorOnly(_) => "sensor_only",
            Self::Neither => "neither",
        }
    }
}
