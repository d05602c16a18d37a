//! Per-cycle readings produced by the two upstream fetchers.
//!
//! Both records are ephemeral: they are created fresh on every poll cycle
//! and dropped once the cycle has been evaluated.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// All timestamps are UTC.
pub type Timestamp = DateTime<Utc>;

/// Latest telemetry entry from the sensor channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub temperature: f64,
    pub humidity: f64,
    /// Soil moisture percentage.
    pub soil_moisture: f64,
    pub light: f64,
    /// When the channel recorded the entry, if the feed carried a timestamp.
    pub observed_at: Option<Timestamp>,
}

/// Plant health classification returned by the inference model.
///
/// Only `Critical` carries meaning for alerting; any label the model
/// returns that is neither `Normal` nor `Critical` is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Normal,
    Critical,
    Other(String),
}

impl HealthStatus {
    /// Classify a raw label. Matching is exact and case-sensitive.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Normal" => Self::Normal,
            "Critical" => Self::Critical,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Critical)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("Normal"),
            Self::Critical => f.write_str("Critical"),
            Self::Other(label) => f.write_str(label),
        }
    }
}

/// Health analysis and nutrient estimates from the inference endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    pub health_status: HealthStatus,
    pub recommendation: String,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    /// Soil moisture as seen by the model; takes precedence over the
    /// sensor value during evaluation.
    pub soil_moisture: f64,
    /// Informational status string reported by the model for its own
    /// telemetry fetch. Never used for evaluation.
    pub fetch_status: Option<String>,
    /// Informational. Never used for evaluation.
    pub temperature: Option<f64>,
    /// Informational. Never used for evaluation.
    pub humidity: Option<f64>,
}
