//! Logging setup for vendorsync.
//!
//! Diagnostics go through the `tracing` crate and are written to stderr,
//! so they never interleave with the git output on stdout.
//!
//! # Feature Flags
//!
//! - `telemetry` (default): spans and timings around git operations
//! - `release-logs`: Strip debug/trace at compile time
//! - `max-perf`: Disable all tracing for maximum performance

mod init;

pub use init::{init_telemetry, TelemetryConfig, TelemetryGuard};
