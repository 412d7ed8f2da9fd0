//! Load — config loading from file and environment variables.

use std::path::Path;
use std::fs::File;
use std::io::Read;

use super::model::SamplerConfig;

impl SamplerConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var("SAMPLER_CONFIG_FILE")
            .unwrap_or_else(|_| "/etc/sampler/sampler.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using environment variables", config_path);
            Self::from_env()
        };

        // Environment variables override file config for the settings
        // callers usually pass per run
        if let Some(interval) = std::env::var("SAMPLER_INTERVAL_MS").ok().and_then(|s| s.parse().ok()) {
            config.interval_ms = interval;
        }
        if let Ok(input) = std::env::var("SAMPLER_INPUT") {
            config.input_path = Some(input);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: SamplerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            interval_ms: std::env::var("SAMPLER_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.interval_ms),
            record_marker: std::env::var("SAMPLER_RECORD_MARKER")
                .unwrap_or(defaults.record_marker),
            uptime_label: std::env::var("SAMPLER_UPTIME_LABEL")
                .unwrap_or(defaults.uptime_label),
            channel_capacity: std::env::var("SAMPLER_CHANNEL_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.channel_capacity),
            read_chunk_size: std::env::var("SAMPLER_READ_CHUNK_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.read_chunk_size),
            max_record_bytes: std::env::var("SAMPLER_MAX_RECORD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_record_bytes),
            input_path: std::env::var("SAMPLER_INPUT").ok(),
        }
    }
}
