//! Upstream data sources polled on every cycle.
//!
//! The poll cycle only sees these traits, so tests can substitute slow,
//! hanging or failing upstreams without a network.

use std::time::Duration;

use async_trait::async_trait;
use greenpulse_core::{InferenceResult, SensorReading};
use greenpulse_gradio::{GradioClient, GradioError};
use greenpulse_thingspeak::{ThingSpeakClient, ThingSpeakError};

/// Why an upstream produced no data this cycle.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("ThingSpeak: {0}")]
    ThingSpeak(#[from] ThingSpeakError),

    #[error("Inference: {0}")]
    Gradio(#[from] GradioError),

    #[error("Timed out after {0:?}")]
    TimedOut(Duration),

    /// Failure from a source outside the built-in clients.
    #[error("{0}")]
    Other(String),
}

/// Produces the latest telemetry reading.
#[async_trait]
pub trait SensorSource: Send + Sync {
    async fn fetch_reading(&self) -> Result<SensorReading, FetchError>;
}

/// Produces the latest model analysis.
#[async_trait]
pub trait InferenceSource: Send + Sync {
    async fn fetch_inference(&self) -> Result<InferenceResult, FetchError>;
}

#[async_trait]
impl SensorSource for ThingSpeakClient {
    async fn fetch_reading(&self) -> Result<SensorReading, FetchError> {
        Ok(self.latest_reading().await?)
    }
}

#[async_trait]
impl InferenceSource for GradioClient {
    async fn fetch_inference(&self) -> Result<InferenceResult, FetchError> {
        Ok(self.fetch_analysis().await?)
    }
}
