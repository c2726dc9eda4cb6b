//! Telemetry initialization.
//!
//! Provides configuration and initialization for the tracing subscriber.

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Configuration for telemetry initialization.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Default log level
    pub default_level: Level,
    /// Whether to include file and line numbers
    pub include_file_line: bool,
    /// Whether to include the target (module path)
    pub include_target: bool,
    /// Whether to use ANSI colors
    pub ansi_colors: bool,
    /// Custom filter directive (overrides default_level if set)
    pub filter_directive: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_level: Level::WARN,
            include_file_line: false,
            include_target: false,
            ansi_colors: true,
            filter_directive: None,
        }
    }
}

impl TelemetryConfig {
    /// Configuration for `--verbose`: debug events, with their origin.
    pub fn verbose() -> Self {
        Self {
            default_level: Level::DEBUG,
            include_file_line: true,
            include_target: true,
            ..Self::default()
        }
    }

    /// Configuration for `--quiet`: errors only.
    pub fn quiet() -> Self {
        Self {
            default_level: Level::ERROR,
            ..Self::default()
        }
    }
}

/// Guard that keeps the telemetry subscriber active.
pub struct TelemetryGuard {
    #[allow(dead_code)]
    _private: (),
}

/// Initialize telemetry with the given configuration.
///
/// A valid `RUST_LOG` replaces the configured level entirely.
/// Returns a guard that must be kept alive for the duration of the run.
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(config, rust_log.as_deref())?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .with_file(config.include_file_line)
        .with_line_number(config.include_file_line)
        .compact();

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(TelemetryGuard { _private: () })
}

/// Pick the event filter: an explicit directive, then `rust_log` when it
/// parses, then `warn` overall with the configured level for this crate.
fn build_filter(config: &TelemetryConfig, rust_log: Option<&str>) -> anyhow::Result<EnvFilter> {
    if let Some(ref directive) = config.filter_directive {
        return Ok(EnvFilter::try_new(directive)?);
    }

    if let Some(filter) = rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
    {
        return Ok(filter);
    }

    Ok(EnvFilter::try_new(format!(
        "warn,vendorsync={}",
        config.default_level.as_str().to_lowercase()
    ))?)
}
