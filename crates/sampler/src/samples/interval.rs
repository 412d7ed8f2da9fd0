//! Interval filter — drop snapshots taken closer together than a minimum
//! interval, using the server's own `Uptime` counter as the clock.
//!
//! Runs on the record preamble before parsing, so skipped records are never
//! split into fields.

use std::time::Duration;
use bytes::Bytes;

use crate::parser::scan::{find, find_newline, trim_matches};

/// Intervals below this disable filtering entirely.
pub const MIN_FILTER_INTERVAL: Duration = Duration::from_secs(1);

/// Characters stripped around the uptime value, for both layouts.
const VALUE_BORDER: &[u8] = b"| \t\r";

pub struct IntervalFilter {
    interval: Duration,
    label: Bytes,
    enabled: bool,
    /// Uptime of the last admitted record
    baseline: Option<f64>,
}

impl IntervalFilter {
    pub fn new(interval: Duration, label: impl Into<Bytes>) -> Self {
        Self {
            interval,
            label: label.into(),
            enabled: interval >= MIN_FILTER_INTERVAL,
            baseline: None,
        }
    }

    /// A filter that admits everything.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Bytes::new())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn baseline(&self) -> Option<f64> {
        self.baseline
    }

    /// Returns true if the record with this preamble arrived too soon after
    /// the last admitted one. Admitting a record moves the baseline.
    ///
    /// Fails open: a missing or unparsable uptime is always admitted.
    pub fn should_skip(&mut self, preamble: &[u8]) -> bool {
        if !self.enabled {
            return false;
        }

        let current = match extract_uptime(preamble, &self.label) {
            Some(uptime) => uptime,
            None => {
                tracing::trace!("interval: no uptime in record, admitting");
                return false;
            }
        };

        match self.baseline {
            Some(prev) if current < prev => {
                tracing::debug!(prev, current, "interval: uptime went backwards, re-baselining");
                self.baseline = Some(current);
                false
            }
            Some(prev) if current - prev < self.interval.as_secs_f64() => {
                tracing::debug!(
                    prev,
                    current,
                    interval_secs = self.interval.as_secs_f64(),
                    "interval: record too early, skipping"
                );
                true
            }
            _ => {
                self.baseline = Some(current);
                false
            }
        }
    }
}

/// Find `label` in the preamble and parse the rest of its line as seconds.
///
/// Works for both `Uptime\t100` and `| Uptime   | 100   |`.
pub fn extract_uptime(preamble: &[u8], label: &[u8]) -> Option<f64> {
    let start = find(preamble, label)? + label.len();
    let rest = &preamble[start..];
    let end = find_newline(rest).unwrap_or(rest.len());

    let value = trim_matches(&rest[..end], VALUE_BORDER);
    std::str::from_utf8(value).ok()?.parse::<f64>().ok()
}
