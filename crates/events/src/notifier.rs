//! Alert notification.
//!
//! [`Notifier`] turns a cycle's alert lines into one SMS. It never retries
//! and never escalates: every outcome is logged and reported back as a
//! [`NotifyOutcome`] for the caller to inspect.

use greenpulse_core::message::format_alert_message;
use greenpulse_core::AlertLine;

use crate::delivery::sms::{SmsError, SmsGateway};

/// What happened to a notification request.
#[derive(Debug)]
pub enum NotifyOutcome {
    /// The gateway accepted the message.
    Sent { message_sid: String },
    /// No alert lines; nothing was sent.
    NothingToSend,
    /// SMS is not configured; nothing was sent.
    Disabled,
    /// The single send attempt failed.
    Failed(SmsError),
}

/// Sends alert summaries through an optional SMS gateway.
pub struct Notifier {
    gateway: Option<Box<dyn SmsGateway>>,
}

impl Notifier {
    pub fn new(gateway: Box<dyn SmsGateway>) -> Self {
        Self {
            gateway: Some(gateway),
        }
    }

    /// A notifier with no gateway. Every request is logged and dropped.
    pub fn disabled() -> Self {
        Self { gateway: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.gateway.is_some()
    }

    /// Send one SMS containing every alert line, in order.
    pub async fn notify(&self, alerts: &[AlertLine]) -> NotifyOutcome {
        if alerts.is_empty() {
            return NotifyOutcome::NothingToSend;
        }
        self.send_body(&format_alert_message(alerts)).await
    }

    /// Send an arbitrary body, e.g. a connectivity test message.
    pub async fn send_body(&self, body: &str) -> NotifyOutcome {
        let Some(gateway) = &self.gateway else {
            tracing::warn!("SMS credentials not configured -- cannot send SMS");
            return NotifyOutcome::Disabled;
        };

        match gateway.send(body).await {
            Ok(message_sid) => {
                tracing::info!(message_sid = %message_sid, "SMS sent successfully");
                NotifyOutcome::Sent { message_sid }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to send SMS");
                NotifyOutcome::Failed(e)
            }
        }
    }
}
