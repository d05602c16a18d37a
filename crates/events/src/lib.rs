//! Green Pulse alert notification.
//!
//! - [`delivery`] -- external delivery channels (Twilio SMS).
//! - [`Notifier`] -- formats a cycle's alert lines and sends them once.

pub mod delivery;
pub mod notifier;

pub use delivery::sms::{IncompleteSmsConfig, SmsError, SmsGateway, TwilioConfig, TwilioSms};
pub use notifier::{Notifier, NotifyOutcome};
