use std::sync::atomic::{AtomicU64, Ordering};
use serde::Serialize;

use super::Layout;

/// Layout detection outcomes (one per stream)
#[derive(Debug, Default)]
pub struct DetectionMetrics {
    pub batch: AtomicU64,
    pub tabular: AtomicU64,
}

/// Record counters (updated once per record)
#[derive(Debug, Default)]
pub struct RecordMetrics {
    /// Records cut out of the stream, before interval filtering
    pub segmented: AtomicU64,
    /// Records dropped because they arrived before the minimum interval
    pub skipped: AtomicU64,
    pub published: AtomicU64,
    /// Records that produced no fields
    pub empty: AtomicU64,
    pub bytes: AtomicU64,
}

/// Line counters (updated per parsed record)
#[derive(Debug, Default)]
pub struct LineMetrics {
    pub fields: AtomicU64,
    pub discarded: AtomicU64,
}

/// Counters for the sampling pipeline.
///
/// The pipeline runs on a single task, but the struct is shared through an
/// `Arc` so that callers can take snapshots while it runs.
///
/// # Memory Ordering
///
/// All operations use `Ordering::Relaxed`. These are observability counters,
/// eventual correctness is enough.
///
/// # Snapshot Consistency
///
/// `snapshot()` reads are not atomic across fields; a snapshot taken
/// mid-record may count a record as segmented but not yet published.
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    pub detection: DetectionMetrics,
    pub records: RecordMetrics,
    pub lines: LineMetrics,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the layout chosen for a stream
    #[inline]
    pub fn record_detection(&self, layout: Layout) {
        match layout {
            Layout::Batch => self.detection.batch.fetch_add(1, Ordering::Relaxed),
            Layout::Tabular => self.detection.tabular.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Record a record cut out of the stream
    #[inline]
    pub fn record_segmented(&self, len: usize) {
        self.records.segmented.fetch_add(1, Ordering::Relaxed);
        self.records.bytes.fetch_add(len as u64, Ordering::Relaxed);
    }

    /// Record a record suppressed by the interval filter
    #[inline]
    pub fn record_skipped(&self) {
        self.records.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of parsing one record
    #[inline]
    pub fn record_parse(&self, fields: usize, discarded: usize) {
        self.lines.fields.fetch_add(fields as u64, Ordering::Relaxed);
        self.lines.discarded.fetch_add(discarded as u64, Ordering::Relaxed);
        if fields == 0 {
            self.records.empty.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn record_published(&self) {
        self.records.published.fetch_add(1, Ordering::Relaxed);
    }

    /// Create a snapshot of current metrics.
    ///
    /// Returns a serializable struct suitable for logging.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batch_streams: self.detection.batch.load(Ordering::Relaxed),
            tabular_streams: self.detection.tabular.load(Ordering::Relaxed),
            records_segmented: self.records.segmented.load(Ordering::Relaxed),
            records_skipped: self.records.skipped.load(Ordering::Relaxed),
            records_empty: self.records.empty.load(Ordering::Relaxed),
            samples_published: self.records.published.load(Ordering::Relaxed),
            bytes_segmented: self.records.bytes.load(Ordering::Relaxed),
            fields_parsed: self.lines.fields.load(Ordering::Relaxed),
            lines_discarded: self.lines.discarded.load(Ordering::Relaxed),
        }
    }
}

/// A read-only snapshot of pipeline metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub batch_streams: u64,
    pub tabular_streams: u64,
    pub records_segmented: u64,
    pub records_skipped: u64,
    pub records_empty: u64,
    pub samples_published: u64,
    pub bytes_segmented: u64,
    pub fields_parsed: u64,
    pub lines_discarded: u64,
}
