//! `greenpulse-agent` library crate.
//!
//! Re-exports internal modules for integration testing. The binary
//! entrypoints live in `main.rs` and `bin/test_sms.rs`.

pub mod config;
pub mod cycle;
pub mod scheduler;
pub mod sources;
