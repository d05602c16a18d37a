//! Integration tests for [`ThingSpeakClient`] against a local mock server.

use std::time::Duration;

use assert_matches::assert_matches;
use greenpulse_thingspeak::{ThingSpeakClient, ThingSpeakConfig, ThingSpeakError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, api_key: Option<&str>) -> ThingSpeakClient {
    ThingSpeakClient::new(
        ThingSpeakConfig {
            base_url: server.uri(),
            channel_id: "2638062".to_string(),
            api_key: api_key.map(str::to_string),
        },
        Duration::from_secs(5),
    )
}

// ---------------------------------------------------------------------------
// Test: successful fetch
// ---------------------------------------------------------------------------

/// The client requests exactly one result with the API key and maps
/// field1..field4 onto the reading.
#[tokio::test]
async fn latest_reading_requests_one_result_with_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels/2638062/feeds.json"))
        .and(query_param("results", "1"))
        .and(query_param("api_key", "READKEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "channel": { "id": 2638062, "name": "Green Pulse" },
            "feeds": [{
                "created_at": "2024-11-02T08:15:00Z",
                "entry_id": 7,
                "field1": "26.1",
                "field2": "48",
                "field3": "22",
                "field4": "512"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reading = client(&server, Some("READKEY"))
        .latest_reading()
        .await
        .expect("reading should parse");

    assert_eq!(reading.temperature, 26.1);
    assert_eq!(reading.humidity, 48.0);
    assert_eq!(reading.soil_moisture, 22.0);
    assert_eq!(reading.light, 512.0);
}

/// Public channels are read without an `api_key` parameter.
#[tokio::test]
async fn latest_reading_without_key_omits_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels/2638062/feeds.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "feeds": [{ "field3": "64" }]
        })))
        .mount(&server)
        .await;

    let reading = client(&server, None).latest_reading().await.unwrap();
    assert_eq!(reading.soil_moisture, 64.0);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].url.query().unwrap_or("").contains("api_key"));
}

// ---------------------------------------------------------------------------
// Test: failure modes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_success_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string("-1"))
        .mount(&server)
        .await;

    let err = client(&server, Some("bad")).latest_reading().await.unwrap_err();
    assert_matches!(err, ThingSpeakError::Api { status: 400, ref body } if body == "-1");
}

#[tokio::test]
async fn empty_feed_is_no_feeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "channel": { "id": 2638062 },
            "feeds": []
        })))
        .mount(&server)
        .await;

    let err = client(&server, None).latest_reading().await.unwrap_err();
    assert_matches!(err, ThingSpeakError::NoFeeds);
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server, None).latest_reading().await.unwrap_err();
    assert_matches!(err, ThingSpeakError::Malformed(_));
}

#[tokio::test]
async fn slow_server_hits_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "feeds": [{ "field3": "50" }] }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = ThingSpeakClient::new(
        ThingSpeakConfig {
            base_url: server.uri(),
            channel_id: "2638062".to_string(),
            api_key: None,
        },
        Duration::from_millis(200),
    );

    let err = client.latest_reading().await.unwrap_err();
    assert_matches!(err, ThingSpeakError::Request(ref e) if e.is_timeout());
}
