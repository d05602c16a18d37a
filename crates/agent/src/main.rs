//! `greenpulse-agent` -- plant health monitor.
//!
//! Polls the ThingSpeak sensor channel and the hosted NPK predictor,
//! checks the results against thresholds, and texts an alert summary via
//! Twilio when any threshold is breached. Runs one check immediately and
//! then one per `POLL_INTERVAL_SECS` until stopped with SIGINT/SIGTERM.
//!
//! See [`AgentConfig::from_env`] for the environment variables.

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greenpulse_agent::config::AgentConfig;
use greenpulse_agent::cycle::Monitor;
use greenpulse_agent::scheduler::Scheduler;

const DEFAULT_LOG_FILTER: &str =
    "greenpulse_agent=info,greenpulse_events=info,greenpulse_thingspeak=info,greenpulse_gradio=info";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AgentConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!(
        channel_id = %config.thingspeak.channel_id,
        inference_url = %config.gradio.space_url,
        poll_interval_secs = config.poll_interval.as_secs(),
        fetch_timeout_secs = config.fetch_timeout.as_secs(),
        sms_enabled = config.sms.is_some(),
        "Starting greenpulse-agent",
    );

    if config.sms.is_none() {
        tracing::warn!("Twilio credentials not configured -- alerts will be logged but not sent");
    }

    let monitor = Monitor::from_config(&config);
    let scheduler = Scheduler::new(config.poll_interval);

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_cancel.cancel();
    });

    let monitor = &monitor;
    let cycles = scheduler
        .run(cancel, move || async move {
            monitor.run_cycle().await;
        })
        .await;

    tracing::info!(cycles, "greenpulse-agent stopped");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), stopping after the current check");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, stopping after the current check");
        }
    }
}
