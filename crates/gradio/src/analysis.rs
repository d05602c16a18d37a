//! Mapping from the predictor's positional output tuple.
//!
//! `/analyze_live_data` returns nine values:
//!
//! | Index | Value              | Used for evaluation |
//! |-------|--------------------|---------------------|
//! | 0     | fetch status       | no                  |
//! | 1     | health status      | yes                 |
//! | 2     | recommendation     | yes                 |
//! | 3     | nitrogen           | yes                 |
//! | 4     | phosphorus         | yes                 |
//! | 5     | potassium          | yes                 |
//! | 6     | soil moisture      | yes                 |
//! | 7     | temperature        | no                  |
//! | 8     | humidity           | no                  |

use greenpulse_core::{HealthStatus, InferenceResult};
use serde_json::Value;

use crate::api::GradioError;

/// Minimum tuple length: everything up to and including soil moisture.
const REQUIRED_LEN: usize = 7;

/// Convert an output tuple into an [`InferenceResult`].
///
/// Indices 1-6 are required. Numeric slots accept either JSON numbers or
/// numeric strings. The recommendation accepts any value: `null` reads as
/// empty text and other non-strings are rendered as JSON. Indices 0, 7 and
/// 8 are optional and read leniently.
pub fn parse_analysis(data: &[Value]) -> Result<InferenceResult, GradioError> {
    if data.len() < REQUIRED_LEN {
        return Err(GradioError::MalformedOutput(format!(
            "expected at least {REQUIRED_LEN} values, got {}",
            data.len()
        )));
    }

    Ok(InferenceResult {
        health_status: HealthStatus::from_label(&required_text(data, 1, "health status")?),
        recommendation: display_text(&data[2]),
        nitrogen: required_number(data, 3, "nitrogen")?,
        phosphorus: required_number(data, 4, "phosphorus")?,
        potassium: required_number(data, 5, "potassium")?,
        soil_moisture: required_number(data, 6, "soil moisture")?,
        fetch_status: data.first().and_then(|v| v.as_str()).map(str::to_string),
        temperature: data.get(7).and_then(as_number),
        humidity: data.get(8).and_then(as_number),
    })
}

fn required_text(data: &[Value], idx: usize, name: &str) -> Result<String, GradioError> {
    match &data[idx] {
        Value::String(s) => Ok(s.clone()),
        other => Err(GradioError::MalformedOutput(format!(
            "{name} (index {idx}) must be a string, got {other}"
        ))),
    }
}

fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn required_number(data: &[Value], idx: usize, name: &str) -> Result<f64, GradioError> {
    as_number(&data[idx]).ok_or_else(|| {
        GradioError::MalformedOutput(format!(
            "{name} (index {idx}) must be numeric, got {}",
            data[idx]
        ))
    })
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
