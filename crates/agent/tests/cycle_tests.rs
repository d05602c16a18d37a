//! Integration tests for a single poll cycle ([`Monitor::run_cycle`]).
//!
//! Upstreams and the SMS gateway are mostly in-process doubles, and
//! timer-driven tests run on tokio's paused clock. The ThingSpeak section
//! drives the real client against a local mock server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use greenpulse_agent::cycle::Monitor;
use greenpulse_agent::sources::{FetchError, InferenceSource, SensorSource};
use greenpulse_core::{AlertKind, HealthStatus, InferenceResult, Readings, SensorReading, Thresholds};
use greenpulse_events::{Notifier, NotifyOutcome, SmsError, SmsGateway};
use greenpulse_thingspeak::{ThingSpeakClient, ThingSpeakConfig};
use serde_json::json;
use tokio::time::Instant;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Doubles
// ---------------------------------------------------------------------------

enum Behaviour<T> {
    Ready(T),
    Fail,
    Hang,
    After(Duration, T),
}

struct FakeSensor(Behaviour<SensorReading>);

#[async_trait]
impl SensorSource for FakeSensor {
    async fn fetch_reading(&self) -> Result<SensorReading, FetchError> {
        resolve(&self.0).await
    }
}

struct FakeInference {
    behaviour: Behaviour<InferenceResult>,
    started_at: Arc<Mutex<Option<Instant>>>,
}

#[async_trait]
impl InferenceSource for FakeInference {
    async fn fetch_inference(&self) -> Result<InferenceResult, FetchError> {
        *self.started_at.lock().unwrap() = Some(Instant::now());
        resolve(&self.behaviour).await
    }
}

async fn resolve<T: Clone>(behaviour: &Behaviour<T>) -> Result<T, FetchError> {
    match behaviour {
        Behaviour::Ready(value) => Ok(value.clone()),
        Behaviour::Fail => Err(FetchError::Other("connection refused".to_string())),
        Behaviour::Hang => std::future::pending().await,
        Behaviour::After(delay, value) => {
            tokio::time::sleep(*delay).await;
            Ok(value.clone())
        }
    }
}

#[derive(Clone, Default)]
struct RecordingGateway {
    sent: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl SmsGateway for RecordingGateway {
    async fn send(&self, body: &str) -> Result<String, SmsError> {
        self.sent.lock().unwrap().push(body.to_string());
        Ok("SM-test".to_string())
    }
}

fn sensor(moisture: f64) -> SensorReading {
    SensorReading {
        temperature: 25.0,
        humidity: 50.0,
        soil_moisture: moisture,
        light: 600.0,
        observed_at: None,
    }
}

fn inference(status: &str, n: f64, p: f64, k: f64, moisture: f64) -> InferenceResult {
    InferenceResult {
        health_status: HealthStatus::from_label(status),
        recommendation: "Add compost".to_string(),
        nitrogen: n,
        phosphorus: p,
        potassium: k,
        soil_moisture: moisture,
        fetch_status: Some("ok".to_string()),
        temperature: None,
        humidity: None,
    }
}

/// The cycle took one fetch timeout (allowing for timer granularity).
fn assert_elapsed_one_timeout(start: Instant) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= FETCH_TIMEOUT && elapsed < FETCH_TIMEOUT + Duration::from_secs(1),
        "expected one fetch timeout, took {elapsed:?}"
    );
}

struct Harness {
    monitor: Monitor,
    gateway: RecordingGateway,
    inference_started_at: Arc<Mutex<Option<Instant>>>,
}

fn harness(sensor: Behaviour<SensorReading>, inference: Behaviour<InferenceResult>) -> Harness {
    let gateway = RecordingGateway::default();
    let inference_started_at = Arc::new(Mutex::new(None));
    let monitor = Monitor::new(
        Box::new(FakeSensor(sensor)),
        Box::new(FakeInference {
            behaviour: inference,
            started_at: Arc::clone(&inference_started_at),
        }),
        Notifier::new(Box::new(gateway.clone())),
        Thresholds::default(),
        FETCH_TIMEOUT,
    );
    Harness {
        monitor,
        gateway,
        inference_started_at,
    }
}

// ---------------------------------------------------------------------------
// Test: evaluation and notification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn both_absent_skips_notification() {
    let h = harness(Behaviour::Fail, Behaviour::Fail);

    let report = h.monitor.run_cycle().await;

    assert_eq!(report.readings, Readings::Neither);
    assert!(report.alerts.is_empty());
    assert!(report.notification.is_none());
    assert!(h.gateway.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn healthy_inference_sends_nothing() {
    let h = harness(
        Behaviour::Fail,
        Behaviour::Ready(inference("Normal", 12.0, 6.0, 9.0, 45.0)),
    );

    let report = h.monitor.run_cycle().await;

    assert_matches!(report.readings, Readings::InferenceOnly(_));
    assert!(report.alerts.is_empty());
    assert!(report.notification.is_none());
    assert!(h.gateway.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn critical_inference_sends_one_sms_with_six_lines() {
    let h = harness(
        Behaviour::Ready(sensor(70.0)),
        Behaviour::Ready(inference("Critical", 3.0, 2.0, 4.0, 20.0)),
    );

    let report = h.monitor.run_cycle().await;

    assert_eq!(report.alerts.len(), 6);
    assert_matches!(report.notification, Some(NotifyOutcome::Sent { .. }));

    let sent = h.gateway.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    for alert in &report.alerts {
        assert!(sent[0].contains(&alert.message), "missing line: {}", alert.message);
    }
}

#[tokio::test]
async fn sensor_only_low_moisture_alerts() {
    let h = harness(Behaviour::Ready(sensor(12.0)), Behaviour::Fail);

    let report = h.monitor.run_cycle().await;

    assert_matches!(report.readings, Readings::SensorOnly(_));
    let kinds: Vec<_> = report.alerts.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![AlertKind::MoistureLow]);
    assert_eq!(h.gateway.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn disabled_notifier_reports_disabled() {
    let monitor = Monitor::new(
        Box::new(FakeSensor(Behaviour::Ready(sensor(5.0)))),
        Box::new(FakeInference {
            behaviour: Behaviour::Fail,
            started_at: Arc::new(Mutex::new(None)),
        }),
        Notifier::disabled(),
        Thresholds::default(),
        FETCH_TIMEOUT,
    );

    let report = monitor.run_cycle().await;

    assert_eq!(report.alerts.len(), 1);
    assert_matches!(report.notification, Some(NotifyOutcome::Disabled));
}

// ---------------------------------------------------------------------------
// Test: concurrent fetches with independent timeouts
// ---------------------------------------------------------------------------

/// A hanging sensor upstream neither delays the start of the inference
/// fetch nor prevents its data from being evaluated.
#[tokio::test(start_paused = true)]
async fn hanging_sensor_does_not_block_inference() {
    let h = harness(
        Behaviour::Hang,
        Behaviour::After(
            Duration::from_secs(2),
            inference("Normal", 3.0, 6.0, 9.0, 45.0),
        ),
    );
    let start = Instant::now();

    let report = h.monitor.run_cycle().await;

    let inference_started = h.inference_started_at.lock().unwrap().expect("inference fetched");
    assert!(inference_started - start < Duration::from_secs(1));
    assert_elapsed_one_timeout(start);

    assert_matches!(report.readings, Readings::InferenceOnly(_));
    let kinds: Vec<_> = report.alerts.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![AlertKind::NitrogenLow]);
    assert_eq!(h.gateway.sent.lock().unwrap().len(), 1);
}

/// A hanging inference upstream falls back to sensor moisture after the
/// timeout.
#[tokio::test(start_paused = true)]
async fn hanging_inference_falls_back_to_sensor() {
    let h = harness(Behaviour::Ready(sensor(18.0)), Behaviour::Hang);
    let start = Instant::now();

    let report = h.monitor.run_cycle().await;

    assert_elapsed_one_timeout(start);
    assert_matches!(report.readings, Readings::SensorOnly(_));
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].kind, AlertKind::MoistureLow);
}

/// Both upstreams hanging costs one timeout, not two.
#[tokio::test(start_paused = true)]
async fn both_hanging_costs_a_single_timeout() {
    let h = harness(Behaviour::Hang, Behaviour::Hang);
    let start = Instant::now();

    let report = h.monitor.run_cycle().await;

    assert_elapsed_one_timeout(start);
    assert_eq!(report.readings, Readings::Neither);
    assert!(h.gateway.sent.lock().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: real ThingSpeak client
// ---------------------------------------------------------------------------

async fn thingspeak_server(entry: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels/2638062/feeds.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "channel": { "id": 2638062 },
            "feeds": [entry]
        })))
        .mount(&server)
        .await;
    server
}

fn thingspeak_monitor(server: &MockServer, gateway: &RecordingGateway) -> Monitor {
    let sensor = ThingSpeakClient::new(
        ThingSpeakConfig {
            base_url: server.uri(),
            channel_id: "2638062".to_string(),
            api_key: None,
        },
        Duration::from_secs(5),
    );
    Monitor::new(
        Box::new(sensor),
        Box::new(FakeInference {
            behaviour: Behaviour::Fail,
            started_at: Arc::new(Mutex::new(None)),
        }),
        Notifier::new(Box::new(gateway.clone())),
        Thresholds::default(),
        Duration::from_secs(5),
    )
}

/// A skipped field arrives as `null`; the entry is unusable, so with the
/// predictor also down the cycle has no data and sends nothing.
#[tokio::test]
async fn null_sensor_field_counts_as_no_data() {
    let server = thingspeak_server(json!({
        "created_at": "2024-11-02T08:15:00Z",
        "field1": "24.5",
        "field2": "61",
        "field3": null,
        "field4": "730"
    }))
    .await;
    let gateway = RecordingGateway::default();

    let report = thingspeak_monitor(&server, &gateway).run_cycle().await;

    assert_eq!(report.readings, Readings::Neither);
    assert!(report.alerts.is_empty());
    assert!(report.notification.is_none());
    assert!(gateway.sent.lock().unwrap().is_empty());
}

/// A complete entry with dry soil still alerts through the real client.
#[tokio::test]
async fn thingspeak_low_moisture_sends_sms() {
    let server = thingspeak_server(json!({
        "field1": "24.5",
        "field2": "61",
        "field3": "18",
        "field4": "730"
    }))
    .await;
    let gateway = RecordingGateway::default();

    let report = thingspeak_monitor(&server, &gateway).run_cycle().await;

    assert_matches!(report.readings, Readings::SensorOnly(_));
    let sent = gateway.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("💧 Soil Moisture is LOW (18.0%)"));
}
