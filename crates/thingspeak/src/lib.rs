//! ThingSpeak REST client for the plant sensor channel.
//!
//! Reads the most recent entry of a channel feed and maps its numbered
//! fields onto a [`SensorReading`]:
//!
//! | Field    | Meaning              |
//! |----------|----------------------|
//! | `field1` | temperature          |
//! | `field2` | humidity             |
//! | `field3` | soil moisture (%)    |
//! | `field4` | light intensity      |

pub mod feed;

use std::time::Duration;

use greenpulse_core::SensorReading;

pub use feed::{ChannelFeed, FeedEntry};

/// Public ThingSpeak API host.
pub const DEFAULT_BASE_URL: &str = "https://api.thingspeak.com";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from the ThingSpeak client.
#[derive(Debug, thiserror::Error)]
pub enum ThingSpeakError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// ThingSpeak returned a non-2xx status code.
    #[error("ThingSpeak API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The body was not the expected channel feed JSON.
    #[error("Malformed feed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The channel returned no entries.
    #[error("Channel feed contains no entries")]
    NoFeeds,

    /// A field was present but could not be read as a number.
    #[error("Field {field} is not numeric: {value}")]
    InvalidField { field: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Where to read the sensor channel from.
#[derive(Debug, Clone)]
pub struct ThingSpeakConfig {
    /// API host, e.g. `https://api.thingspeak.com`.
    pub base_url: String,
    pub channel_id: String,
    /// Read API key. Public channels do not need one.
    pub api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for one ThingSpeak channel.
pub struct ThingSpeakClient {
    client: reqwest::Client,
    config: ThingSpeakConfig,
}

impl ThingSpeakClient {
    /// Create a client whose requests give up after `timeout`.
    pub fn new(config: ThingSpeakConfig, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    /// `GET /channels/{id}/feeds.json` URL, without query parameters.
    pub fn feed_url(&self) -> String {
        format!(
            "{}/channels/{}/feeds.json",
            self.config.base_url.trim_end_matches('/'),
            self.config.channel_id
        )
    }

    /// Fetch the latest channel entry and convert it to a reading.
    pub async fn latest_reading(&self) -> Result<SensorReading, ThingSpeakError> {
        let mut request = self.client.get(self.feed_url()).query(&[("results", "1")]);
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("api_key", key.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ThingSpeakError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let feed: ChannelFeed = serde_json::from_str(&body)?;
        let reading = feed.latest()?;

        tracing::debug!(
            channel_id = %self.config.channel_id,
            soil_moisture = reading.soil_moisture,
            "Fetched ThingSpeak reading",
        );

        Ok(reading)
    }
}
