//! HTTP client for a Gradio app's `call` endpoints.
//!
//! A prediction is two requests:
//!
//! 1. `POST {space}{prefix}/call/{api}` with `{"data": [...]}` queues the
//!    job and returns an `event_id`.
//! 2. `GET {space}{prefix}/call/{api}/{event_id}` streams server-sent
//!    events until a `complete` (or `error`) event arrives.

use std::time::Duration;

use greenpulse_core::InferenceResult;
use serde::Deserialize;
use serde_json::Value;

use crate::analysis::parse_analysis;
use crate::sse::{self, SseEvent};

/// Hosted NPK predictor space.
pub const DEFAULT_SPACE_URL: &str = "https://vipul918-npkvaluepredictor.hf.space";

/// Route prefix used by Gradio 5 apps. Older apps serve at the root.
pub const DEFAULT_API_PREFIX: &str = "/gradio_api";

/// Live analysis endpoint; the model reads the telemetry channel itself.
pub const DEFAULT_API_NAME: &str = "/analyze_live_data";

const EVENT_COMPLETE: &str = "complete";
const EVENT_ERROR: &str = "error";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from the Gradio client.
#[derive(Debug, thiserror::Error)]
pub enum GradioError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The app returned a non-2xx status code.
    #[error("Gradio API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// A response body was not the expected JSON.
    #[error("Malformed Gradio response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The prediction ran and reported an error event.
    #[error("Prediction failed: {0}")]
    Prediction(String),

    /// The event stream closed without a `complete` or `error` event.
    #[error("Event stream ended without a result")]
    MissingResult,

    /// The output tuple did not have the expected shape.
    #[error("Malformed prediction output: {0}")]
    MalformedOutput(String),
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Where and how to reach the predictor.
#[derive(Debug, Clone)]
pub struct GradioConfig {
    /// Base URL of the app, e.g. `https://owner-space.hf.space`.
    pub space_url: String,
    /// Route prefix, `/gradio_api` for Gradio 5, empty for Gradio 4.
    pub api_prefix: String,
    /// Endpoint name including the leading slash.
    pub api_name: String,
    /// Hugging Face token for private spaces.
    pub hf_token: Option<String>,
}

impl Default for GradioConfig {
    fn default() -> Self {
        Self {
            space_url: DEFAULT_SPACE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            api_name: DEFAULT_API_NAME.to_string(),
            hf_token: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueuedCall {
    event_id: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for a single Gradio endpoint.
pub struct GradioClient {
    client: reqwest::Client,
    config: GradioConfig,
}

impl GradioClient {
    /// Create a client whose individual requests give up after `timeout`.
    pub fn new(config: GradioConfig, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    /// `{space}{prefix}/call/{api}` with stray slashes normalised.
    pub fn call_url(&self) -> String {
        let base = self.config.space_url.trim_end_matches('/');
        let prefix = self.config.api_prefix.trim().trim_matches('/');
        let api = self.config.api_name.trim_start_matches('/');

        if prefix.is_empty() {
            format!("{base}/call/{api}")
        } else {
            format!("{base}/{prefix}/call/{api}")
        }
    }

    /// Run a prediction and return the raw output tuple.
    pub async fn predict(&self, inputs: &[Value]) -> Result<Vec<Value>, GradioError> {
        let call_url = self.call_url();

        let queued = self
            .authorize(self.client.post(&call_url))
            .json(&serde_json::json!({ "data": inputs }))
            .send()
            .await?;
        let queued: QueuedCall = serde_json::from_str(&Self::success_body(queued).await?)?;

        tracing::debug!(event_id = %queued.event_id, api = %self.config.api_name, "Gradio call queued");

        let stream = self
            .authorize(self.client.get(format!("{call_url}/{}", queued.event_id)))
            .send()
            .await?;
        let body = Self::success_body(stream).await?;

        Self::extract_result(&sse::parse_events(&body))
    }

    /// Run the live analysis endpoint and map its output.
    pub async fn fetch_analysis(&self) -> Result<InferenceResult, GradioError> {
        let data = self.predict(&[]).await?;
        parse_analysis(&data)
    }

    // ---- private helpers ----

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.hf_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Read the body, turning a non-2xx status into [`GradioError::Api`].
    async fn success_body(response: reqwest::Response) -> Result<String, GradioError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GradioError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    /// Find the terminal event of a result stream.
    fn extract_result(events: &[SseEvent]) -> Result<Vec<Value>, GradioError> {
        for event in events {
            match event.event.as_str() {
                EVENT_COMPLETE => return Ok(serde_json::from_str(&event.data)?),
                EVENT_ERROR => {
                    let detail = match event.data.as_str() {
                        "" | "null" => "no detail from server".to_string(),
                        other => other.to_string(),
                    };
                    return Err(GradioError::Prediction(detail));
                }
                _ => {}
            }
        }
        Err(GradioError::MissingResult)
    }
}
