//! Gradio call-API client for the hosted NPK predictor.
//!
//! Provides the two-step `call` protocol wrapper ([`api`]), a minimal
//! server-sent-event reader for its result stream ([`sse`]) and the
//! mapping from the predictor's output tuple to an
//! [`InferenceResult`](greenpulse_core::InferenceResult) ([`analysis`]).

pub mod analysis;
pub mod api;
pub mod sse;

pub use analysis::parse_analysis;
pub use api::{GradioClient, GradioConfig, GradioError};
