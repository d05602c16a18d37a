//! One fetch-evaluate-notify pass.
//!
//! Both upstreams are fetched concurrently, each under its own timeout,
//! so a hung upstream costs at most one timeout and never holds up the
//! other. Every fetch failure is logged and treated as "no data"; nothing
//! in a cycle is fatal.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use greenpulse_core::{evaluate, AlertLine, Readings, Thresholds};
use greenpulse_events::{Notifier, NotifyOutcome, TwilioSms};
use greenpulse_gradio::GradioClient;
use greenpulse_thingspeak::ThingSpeakClient;

use crate::config::AgentConfig;
use crate::sources::{FetchError, InferenceSource, SensorSource};

/// Summary of a completed cycle, returned for logging and tests.
#[derive(Debug)]
pub struct CycleReport {
    pub readings: Readings,
    pub alerts: Vec<AlertLine>,
    /// `None` when the cycle had no alerts (or no data) and skipped
    /// notification entirely.
    pub notification: Option<NotifyOutcome>,
}

/// Owns the upstream sources, thresholds and notifier for the poll loop.
pub struct Monitor {
    sensor: Box<dyn SensorSource>,
    inference: Box<dyn InferenceSource>,
    notifier: Notifier,
    thresholds: Thresholds,
    fetch_timeout: Duration,
}

impl Monitor {
    pub fn new(
        sensor: Box<dyn SensorSource>,
        inference: Box<dyn InferenceSource>,
        notifier: Notifier,
        thresholds: Thresholds,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            sensor,
            inference,
            notifier,
            thresholds,
            fetch_timeout,
        }
    }

    /// Wire up the real ThingSpeak, Gradio and Twilio clients.
    pub fn from_config(config: &AgentConfig) -> Self {
        let sensor = ThingSpeakClient::new(config.thingspeak.clone(), config.fetch_timeout);
        let inference = GradioClient::new(config.gradio.clone(), config.fetch_timeout);
        let notifier = match &config.sms {
            Some(sms) => Notifier::new(Box::new(TwilioSms::new(sms.clone()))),
            None => Notifier::disabled(),
        };

        Self::new(
            Box::new(sensor),
            Box::new(inference),
            notifier,
            config.thresholds,
            config.fetch_timeout,
        )
    }

    /// Run one cycle to completion.
    pub async fn run_cycle(&self) -> CycleReport {
        tracing::info!(started_at = %Utc::now().to_rfc3339(), "Checking plant status");

        let readings = self.fetch_readings().await;

        if readings.is_empty() {
            tracing::warn!("No data received from either upstream");
            return CycleReport {
                readings,
                alerts: Vec::new(),
                notification: None,
            };
        }

        let alerts = evaluate(&readings, &self.thresholds);
        tracing::info!(
            sources = readings.label(),
            moisture = readings.effective_moisture(),
            alert_count = alerts.len(),
            "Evaluated readings",
        );

        if alerts.is_empty() {
            tracing::info!("Plant is healthy, no alerts needed");
            return CycleReport {
                readings,
                alerts,
                notification: None,
            };
        }

        for alert in &alerts {
            tracing::warn!(kind = ?alert.kind, "{}", alert.message);
        }
        tracing::info!("Thresholds breached, sending SMS");
        let outcome = self.notifier.notify(&alerts).await;

        CycleReport {
            readings,
            alerts,
            notification: Some(outcome),
        }
    }

    /// Fetch both upstreams concurrently and classify the results.
    async fn fetch_readings(&self) -> Readings {
        let (sensor, inference) = tokio::join!(
            bounded(self.fetch_timeout, self.sensor.fetch_reading()),
            bounded(self.fetch_timeout, self.inference.fetch_inference()),
        );

        let sensor = match sensor {
            Ok(reading) => {
                tracing::info!(
                    temperature = reading.temperature,
                    humidity = reading.humidity,
                    soil_moisture = reading.soil_moisture,
                    light = reading.light,
                    observed_at = ?reading.observed_at,
                    "Sensor reading fetched",
                );
                Some(reading)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching sensor data");
                None
            }
        };

        let inference = match inference {
            Ok(result) => {
                tracing::info!(
                    health_status = %result.health_status,
                    nitrogen = result.nitrogen,
                    phosphorus = result.phosphorus,
                    potassium = result.potassium,
                    soil_moisture = result.soil_moisture,
                    fetch_status = ?result.fetch_status,
                    "Inference result fetched",
                );
                Some(result)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching inference data");
                None
            }
        };

        Readings::from_parts(sensor, inference)
    }
}

/// Apply the per-upstream timeout to a fetch.
async fn bounded<T, F>(limit: Duration, fetch: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    tokio::time::timeout(limit, fetch)
        .await
        .unwrap_or(Err(FetchError::TimedOut(limit)))
}
