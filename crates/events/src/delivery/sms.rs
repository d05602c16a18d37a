//! SMS delivery via the Twilio Messages API.
//!
//! [`TwilioSms`] sends a plain-text body from the configured sender number
//! to the configured recipient. Configuration is loaded from environment
//! variables; if none of the Twilio variables are set,
//! [`TwilioConfig::from_env`] returns `Ok(None)` and SMS delivery should be
//! skipped.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

/// Public Twilio API host.
pub const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

/// HTTP request timeout for a single send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const ENV_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
const ENV_AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";
const ENV_FROM_NUMBER: &str = "TWILIO_PHONE_NUMBER";
const ENV_TO_NUMBER: &str = "TARGET_PHONE_NUMBER";
const ENV_BASE_URL: &str = "TWILIO_BASE_URL";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for SMS delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Twilio rejected the message.
    #[error("Twilio returned HTTP {status}{}: {message}", error_code_suffix(*.code))]
    Api {
        status: u16,
        /// Twilio error code, when the body carried one.
        code: Option<i64>,
        message: String,
    },

    /// Twilio accepted the request but the body was not the expected JSON.
    #[error("Malformed Twilio response: {0}")]
    Malformed(#[from] serde_json::Error),
}

fn error_code_suffix(code: Option<i64>) -> String {
    code.map(|c| format!(" (code {c})")).unwrap_or_default()
}

/// Some, but not all, of the Twilio settings were provided.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Incomplete SMS configuration, missing: {}", .missing.join(", "))]
pub struct IncompleteSmsConfig {
    pub missing: Vec<&'static str>,
}

// ---------------------------------------------------------------------------
// SmsGateway
// ---------------------------------------------------------------------------

/// Outbound SMS channel with a fixed sender and recipient.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Send one message and return the provider-assigned message id.
    async fn send(&self, body: &str) -> Result<String, SmsError>;
}

// ---------------------------------------------------------------------------
// TwilioConfig
// ---------------------------------------------------------------------------

/// Credentials and numbers for the Twilio Messages API.
#[derive(Clone)]
pub struct TwilioConfig {
    /// API host (defaults to `https://api.twilio.com`).
    pub base_url: String,
    pub account_sid: String,
    pub auth_token: String,
    /// E.164 sender number owned by the account.
    pub from_number: String,
    /// E.164 destination number for every alert.
    pub to_number: String,
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("base_url", &self.base_url)
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .field("to_number", &self.to_number)
            .finish()
    }
}

impl TwilioConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable              | Required     | Default                  |
    /// |-----------------------|--------------|--------------------------|
    /// | `TWILIO_ACCOUNT_SID`  | all-or-none  | --                       |
    /// | `TWILIO_AUTH_TOKEN`   | all-or-none  | --                       |
    /// | `TWILIO_PHONE_NUMBER` | all-or-none  | --                       |
    /// | `TARGET_PHONE_NUMBER` | all-or-none  | --                       |
    /// | `TWILIO_BASE_URL`     | no           | `https://api.twilio.com` |
    pub fn from_env() -> Result<Option<Self>, IncompleteSmsConfig> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads through `lookup`.
    ///
    /// Blank values count as unset. Returns `Ok(None)` when none of the
    /// four required variables are set.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, IncompleteSmsConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let account_sid = read(ENV_ACCOUNT_SID);
        let auth_token = read(ENV_AUTH_TOKEN);
        let from_number = read(ENV_FROM_NUMBER);
        let to_number = read(ENV_TO_NUMBER);

        match (account_sid, auth_token, from_number, to_number) {
            (None, None, None, None) => Ok(None),
            (Some(account_sid), Some(auth_token), Some(from_number), Some(to_number)) => {
                Ok(Some(Self {
                    base_url: read(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                    account_sid,
                    auth_token,
                    from_number,
                    to_number,
                }))
            }
            (sid, token, from, to) => {
                let missing = [
                    (ENV_ACCOUNT_SID, sid.is_none()),
                    (ENV_AUTH_TOKEN, token.is_none()),
                    (ENV_FROM_NUMBER, from.is_none()),
                    (ENV_TO_NUMBER, to.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(IncompleteSmsConfig { missing })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TwilioSms
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

/// Sends SMS messages through one Twilio account.
pub struct TwilioSms {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioSms {
    /// Create a new delivery service with a pre-configured HTTP client.
    pub fn new(config: TwilioConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    /// `POST` target for message creation.
    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.base_url.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl SmsGateway for TwilioSms {
    async fn send(&self, body: &str) -> Result<String, SmsError> {
        let form = [
            ("To", self.config.to_number.as_str()),
            ("From", self.config.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let parsed = serde_json::from_str::<TwilioErrorBody>(&text).ok();
            return Err(SmsError::Api {
                status: status.as_u16(),
                code: parsed.as_ref().and_then(|b| b.code),
                message: parsed.and_then(|b| b.message).unwrap_or(text),
            });
        }

        let resource: MessageResource = serde_json::from_str(&text)?;
        Ok(resource.sid)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
