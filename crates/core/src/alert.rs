//! Alert lines produced by the evaluator.

use std::fmt;

use serde::Serialize;

/// Which condition an [`AlertLine`] describes.
///
/// Variants are declared in the order the evaluator emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    MoistureLow,
    NitrogenLow,
    PhosphorusLow,
    PotassiumLow,
    CriticalHealth,
    /// The model's recommendation, sent alongside a critical-health line.
    Recommendation,
}

/// One human-readable breached condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertLine {
    pub kind: AlertKind,
    pub message: String,
}

// Values print with at least one decimal place: `20.0`, not `20`.
impl AlertLine {
    pub fn moisture_low(moisture: f64) -> Self {
        Self::new(
            AlertKind::MoistureLow,
            format!("💧 Soil Moisture is LOW ({moisture:?}%)"),
        )
    }

    pub fn nitrogen_low(value: f64) -> Self {
        Self::new(AlertKind::NitrogenLow, format!("📉 Nitrogen is LOW ({value:?})"))
    }

    pub fn phosphorus_low(value: f64) -> Self {
        Self::new(
            AlertKind::PhosphorusLow,
            format!("📉 Phosphorus is LOW ({value:?})"),
        )
    }

    pub fn potassium_low(value: f64) -> Self {
        Self::new(
            AlertKind::PotassiumLow,
            format!("📉 Potassium is LOW ({value:?})"),
        )
    }

    pub fn critical_health() -> Self {
        Self::new(
            AlertKind::CriticalHealth,
            "🚨 Overall Health: CRITICAL".to_string(),
        )
    }

    pub fn recommendation(text: &str) -> Self {
        Self::new(AlertKind::Recommendation, format!("💡 Rec: {text}"))
    }

    fn new(kind: AlertKind, message: String) -> Self {
        Self { kind, message }
    }
}

impl fmt::Display for AlertLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
