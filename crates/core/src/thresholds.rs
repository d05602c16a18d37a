//! Alert thresholds.
//!
//! Every check is a strict "below" comparison: a value equal to its
//! threshold does not alert.

/// Default nitrogen floor.
pub const DEFAULT_NITROGEN_LOW: f64 = 10.0;

/// Default phosphorus floor.
pub const DEFAULT_PHOSPHORUS_LOW: f64 = 5.0;

/// Default potassium floor.
pub const DEFAULT_POTASSIUM_LOW: f64 = 8.0;

/// Default soil moisture floor, in percent.
pub const DEFAULT_MOISTURE_LOW: f64 = 30.0;

/// The four floors applied on every poll cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub nitrogen_low: f64,
    pub phosphorus_low: f64,
    pub potassium_low: f64,
    pub moisture_low: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            nitrogen_low: DEFAULT_NITROGEN_LOW,
            phosphorus_low: DEFAULT_PHOSPHORUS_LOW,
            potassium_low: DEFAULT_POTASSIUM_LOW,
            moisture_low: DEFAULT_MOISTURE_LOW,
        }
    }
}
