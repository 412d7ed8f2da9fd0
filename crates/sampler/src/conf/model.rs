//! Model — SamplerConfig.

use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::parser::{DEFAULT_RECORD_MARKER, DEFAULT_UPTIME_LABEL};
use crate::samples::segment::{DEFAULT_MAX_RECORD_BYTES, DEFAULT_READ_CHUNK_SIZE};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Minimum time between emitted samples; below one second disables filtering
    pub interval_ms: u64,
    /// Line marker that closes a batch record
    pub record_marker: String,
    /// Status variable used as the clock for interval filtering
    pub uptime_label: String,
    pub channel_capacity: usize,
    pub read_chunk_size: usize,
    pub max_record_bytes: usize,
    /// Input file; stdin when unset
    pub input_path: Option<String>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 0,
            record_marker: DEFAULT_RECORD_MARKER.to_string(),
            uptime_label: DEFAULT_UPTIME_LABEL.to_string(),
            channel_capacity: 16,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
            input_path: None,
        }
    }
}

impl SamplerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.record_marker.is_empty() {
            return Err("record_marker must not be empty".to_string());
        }
        if self.uptime_label.is_empty() {
            return Err("uptime_label must not be empty".to_string());
        }
        if self.channel_capacity == 0 {
            return Err("channel_capacity must be > 0".to_string());
        }
        if self.read_chunk_size == 0 {
            return Err("read_chunk_size must be > 0".to_string());
        }
        if self.max_record_bytes < self.read_chunk_size {
            return Err("max_record_bytes must be >= read_chunk_size".to_string());
        }
        Ok(())
    }
}
