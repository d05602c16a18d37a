//! `greenpulse-test-sms` -- send one fixed test message and exit.
//!
//! Uses the same `TWILIO_*` / `TARGET_PHONE_NUMBER` variables as the agent.
//! Exits with status 1 if the credentials are missing or the send fails.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greenpulse_core::message::TEST_MESSAGE;
use greenpulse_events::{Notifier, NotifyOutcome, TwilioConfig, TwilioSms};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "greenpulse_test_sms=info,greenpulse_events=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let present = |key: &str| std::env::var(key).is_ok_and(|v| !v.trim().is_empty());
    tracing::info!(
        from = %std::env::var("TWILIO_PHONE_NUMBER").unwrap_or_default(),
        to = %std::env::var("TARGET_PHONE_NUMBER").unwrap_or_default(),
        sid_present = present("TWILIO_ACCOUNT_SID"),
        token_present = present("TWILIO_AUTH_TOKEN"),
        "Sending test SMS",
    );

    let notifier = match TwilioConfig::from_env() {
        Ok(Some(config)) => Notifier::new(Box::new(TwilioSms::new(config))),
        Ok(None) => {
            tracing::error!("Missing Twilio credentials");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!(error = %e, "Missing Twilio credentials");
            std::process::exit(1);
        }
    };

    match notifier.send_body(TEST_MESSAGE).await {
        NotifyOutcome::Sent { .. } => {}
        _ => std::process::exit(1),
    }
}
