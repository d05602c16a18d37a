use std::time::Duration;

use greenpulse_core::thresholds::{
    DEFAULT_MOISTURE_LOW, DEFAULT_NITROGEN_LOW, DEFAULT_PHOSPHORUS_LOW, DEFAULT_POTASSIUM_LOW,
};
use greenpulse_core::Thresholds;
use greenpulse_events::{IncompleteSmsConfig, TwilioConfig};
use greenpulse_gradio::api::{DEFAULT_API_NAME, DEFAULT_API_PREFIX, DEFAULT_SPACE_URL};
use greenpulse_gradio::GradioConfig;
use greenpulse_thingspeak::{ThingSpeakConfig, DEFAULT_BASE_URL as THINGSPEAK_BASE_URL};

/// Default interval between poll cycles.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Default per-upstream fetch timeout.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error(transparent)]
    IncompleteSms(#[from] IncompleteSmsConfig),
}

/// Agent configuration, loaded once at startup and passed explicitly to
/// every component.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub thingspeak: ThingSpeakConfig,
    pub gradio: GradioConfig,
    /// `None` when no Twilio variables are set; alerts are then logged only.
    pub sms: Option<TwilioConfig>,
    pub thresholds: Thresholds,
    pub poll_interval: Duration,
    /// Upper bound on each upstream fetch within a cycle.
    pub fetch_timeout: Duration,
}

impl AgentConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                | Required    | Default                                        |
    /// |-------------------------|-------------|------------------------------------------------|
    /// | `THINGSPEAK_CHANNEL_ID` | yes         | --                                             |
    /// | `THINGSPEAK_API_KEY`    | no          | --                                             |
    /// | `THINGSPEAK_BASE_URL`   | no          | `https://api.thingspeak.com`                   |
    /// | `GRADIO_SPACE_URL`      | no          | `https://vipul918-npkvaluepredictor.hf.space`  |
    /// | `GRADIO_API_PREFIX`     | no          | `/gradio_api`                                  |
    /// | `GRADIO_API_NAME`       | no          | `/analyze_live_data`                           |
    /// | `HF_TOKEN`              | no          | --                                             |
    /// | `TWILIO_*`, `TARGET_PHONE_NUMBER` | all-or-none | see [`TwilioConfig::from_env`]       |
    /// | `POLL_INTERVAL_SECS`    | no          | `60`                                           |
    /// | `FETCH_TIMEOUT_SECS`    | no          | `15`                                           |
    /// | `NITROGEN_LOW`          | no          | `10`                                           |
    /// | `PHOSPHORUS_LOW`        | no          | `5`                                            |
    /// | `POTASSIUM_LOW`         | no          | `8`                                            |
    /// | `MOISTURE_LOW`          | no          | `30`                                           |
    ///
    /// The ThingSpeak variables also accept the `VITE_`-prefixed names used
    /// by the dashboard's `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let channel_id = read("THINGSPEAK_CHANNEL_ID")
            .or_else(|| read("VITE_THINGSPEAK_CHANNEL_ID"))
            .ok_or(ConfigError::Missing("THINGSPEAK_CHANNEL_ID"))?;

        let thingspeak = ThingSpeakConfig {
            base_url: read("THINGSPEAK_BASE_URL")
                .unwrap_or_else(|| THINGSPEAK_BASE_URL.to_string()),
            channel_id: channel_id.trim().to_string(),
            api_key: read("THINGSPEAK_API_KEY").or_else(|| read("VITE_THINGSPEAK_API_KEY")),
        };

        let gradio = GradioConfig {
            space_url: read("GRADIO_SPACE_URL").unwrap_or_else(|| DEFAULT_SPACE_URL.to_string()),
            // An explicitly empty prefix selects the root routes of older apps.
            api_prefix: lookup("GRADIO_API_PREFIX")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string()),
            api_name: read("GRADIO_API_NAME").unwrap_or_else(|| DEFAULT_API_NAME.to_string()),
            hf_token: read("HF_TOKEN"),
        };

        let sms = TwilioConfig::from_lookup(&lookup)?;

        let thresholds = Thresholds {
            nitrogen_low: parse_threshold(&read, "NITROGEN_LOW", DEFAULT_NITROGEN_LOW)?,
            phosphorus_low: parse_threshold(&read, "PHOSPHORUS_LOW", DEFAULT_PHOSPHORUS_LOW)?,
            potassium_low: parse_threshold(&read, "POTASSIUM_LOW", DEFAULT_POTASSIUM_LOW)?,
            moisture_low: parse_threshold(&read, "MOISTURE_LOW", DEFAULT_MOISTURE_LOW)?,
        };

        let poll_interval = parse_secs(&read, "POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        let fetch_timeout = parse_secs(&read, "FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)?;

        Ok(Self {
            thingspeak,
            gradio,
            sms,
            thresholds,
            poll_interval,
            fetch_timeout,
        })
    }
}

fn parse_threshold<R>(read: &R, var: &'static str, default: f64) -> Result<f64, ConfigError>
where
    R: Fn(&str) -> Option<String>,
{
    let Some(raw) = read(var) else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: "expected a finite number",
        }),
    }
}

fn parse_secs<R>(read: &R, var: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    R: Fn(&str) -> Option<String>,
{
    let Some(raw) = read(var) else {
        return Ok(Duration::from_secs(default));
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: "must be greater than zero",
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: "expected a whole number of seconds",
        }),
    }
}
