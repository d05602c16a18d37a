//! Domain types and pure alerting logic for the Green Pulse plant monitor.
//!
//! Nothing in this crate performs I/O. The fetchers live in
//! `greenpulse-thingspeak` and `greenpulse-gradio`, delivery lives in
//! `greenpulse-events`, and the poll loop lives in `greenpulse-agent`.

pub mod alert;
pub mod evaluator;
pub mod message;
pub mod readings;
pub mod thresholds;
pub mod types;

pub use alert::{AlertKind, AlertLine};
pub use evaluator::evaluate;
pub use readings::Readings;
pub use thresholds::Thresholds;
pub use types::{HealthStatus, InferenceResult, SensorReading};
