//! Threshold evaluation for a single poll cycle.
//!
//! Pure logic -- no I/O and no state carried between cycles. The caller
//! fetches both upstreams, classifies them with [`Readings::from_parts`]
//! and passes the result in.

use crate::alert::AlertLine;
use crate::readings::Readings;
use crate::thresholds::Thresholds;

/// Evaluate one cycle's readings and return the breached conditions.
///
/// Lines are emitted in a fixed order: moisture, nitrogen, phosphorus,
/// potassium, critical health, recommendation. Nutrient checks and the
/// critical-health check are independent of one another and only run
/// when inference data is present.
pub fn evaluate(readings: &Readings, thresholds: &Thresholds) -> Vec<AlertLine> {
    if readings.is_empty() {
        return Vec::new();
    }

    let mut alerts = Vec::new();

    let moisture = readings.effective_moisture();
    if moisture < thresholds.moisture_low {
        alerts.push(AlertLine::moisture_low(moisture));
    }

    if let Some(inference) = readings.inference() {
        if inference.nitrogen < thresholds.nitrogen_low {
            alerts.push(AlertLine::nitrogen_low(inference.nitrogen));
        }
        if inference.phosphorus < thresholds.phosphorus_low {
            alerts.push(AlertLine::phosphorus_low(inference.phosphorus));
        }
        if inference.potassium < thresholds.potassium_low {
            alerts.push(AlertLine::potassium_low(inference.potassium));
        }

        if inference.health_status.is_critical() {
            alerts.push(AlertLine::critical_health());
            alerts.push(AlertLine::recommendation(&inference.recommendation));
        }
    }

    alerts
}
