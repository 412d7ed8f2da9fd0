//! Boot — logging init and config load.

use tracing::{info, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::SamplerConfig;

/// Initialise the tracing / logging subsystem.
///
/// Logs go to stderr; stdout carries the samples.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sampler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load and validate configuration.
pub fn boot() -> Result<SamplerConfig, Box<dyn std::error::Error>> {
    info!("Starting sampler v{}", env!("CARGO_PKG_VERSION"));

    let config = SamplerConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        "Loaded configuration: interval={}ms, record_marker={}, uptime_label={}",
        config.interval_ms, config.record_marker, config.uptime_label
    );
    if config.interval() < crate::samples::interval::MIN_FILTER_INTERVAL {
        info!("Interval filtering disabled (interval below 1s)");
    }

    Ok(config)
}
