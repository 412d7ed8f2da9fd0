//! Segmenter — cut an unbounded status dump into one record per snapshot.
//!
//! The segmenter owns a single growable buffer. It reads from the source
//! only when no boundary is visible in what is already buffered, so memory
//! stays proportional to one record rather than the whole input.
//!
//! Boundaries:
//! - Batch: the configured end-of-record marker (last status variable).
//!   Everything before the marker line is the record.
//! - Tabular: the `| Variable_name` header of the *next* table. The header
//!   line itself is never part of a record.

use std::sync::Arc;
use bytes::{Buf, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_stream::Stream;

use crate::conf::SamplerConfig;
use crate::parser::detector::{boundary_marker, detect_layout};
use crate::parser::metrics::PipelineMetrics;
use crate::parser::scan::{find, find_newline};
use crate::parser::{Layout, RawRecord};

use super::error::SampleError;
use super::interval::IntervalFilter;

pub const DEFAULT_READ_CHUNK_SIZE: usize = 8 * 1024;
pub const DEFAULT_MAX_RECORD_BYTES: usize = 16 * 1024 * 1024;

enum Scan {
    /// A complete record was cut from the buffer
    Record(RawRecord),
    /// Bytes were consumed without producing a record (leading marker or
    /// interval skip); scan again
    Consumed,
    /// No complete boundary in the buffer yet
    Incomplete,
}

pub struct Segmenter<R> {
    reader: R,
    buf: BytesMut,
    eof: bool,
    record_marker: Bytes,
    /// Boundary in use, fixed once the layout is known
    marker: Bytes,
    layout: Option<Layout>,
    filter: IntervalFilter,
    read_chunk_size: usize,
    max_record_bytes: usize,
    metrics: Arc<PipelineMetrics>,
}

impl<R> Segmenter<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R, record_marker: impl Into<Bytes>, filter: IntervalFilter) -> Self {
        Self {
            reader,
            buf: BytesMut::new(),
            eof: false,
            record_marker: record_marker.into(),
            marker: Bytes::new(),
            layout: None,
            filter,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    /// Build a segmenter with the marker, interval filter and limits from `config`.
    pub fn from_config(reader: R, config: &SamplerConfig, metrics: Arc<PipelineMetrics>) -> Self {
        let filter = IntervalFilter::new(config.interval(), config.uptime_label.clone().into_bytes());
        Self::new(reader, config.record_marker.clone().into_bytes(), filter)
            .with_read_chunk_size(config.read_chunk_size)
            .with_max_record_bytes(config.max_record_bytes)
            .with_metrics(metrics)
    }

    pub fn with_read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size.max(1);
        self
    }

    pub fn with_max_record_bytes(mut self, max: usize) -> Self {
        self.max_record_bytes = max;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<PipelineMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Layout of the stream, once the first bytes have been seen.
    pub fn layout(&self) -> Option<Layout> {
        self.layout
    }

    /// Pull the next record.
    ///
    /// Returns `Ok(None)` at end of stream. A read failure is fatal: the
    /// error is returned and any partially buffered record is lost.
    pub async fn next_record(&mut self) -> Result<Option<RawRecord>, SampleError> {
        loop {
            if !self.buf.is_empty() {
                let layout = self.resolve_layout();
                match self.scan(layout) {
                    Scan::Record(record) => return Ok(Some(record)),
                    Scan::Consumed => continue,
                    Scan::Incomplete => {}
                }
            }

            if self.eof {
                return Ok(self.flush_tail());
            }

            if self.buf.len() > self.max_record_bytes {
                tracing::error!(
                    buffered = self.buf.len(),
                    max = self.max_record_bytes,
                    "segmenter: no boundary within record size limit"
                );
                return Err(SampleError::RecordTooLarge(self.buf.len(), self.max_record_bytes));
            }

            self.fill().await?;
        }
    }

    /// Turn the segmenter into a stream of records. The stream ends after
    /// the first error.
    pub fn into_stream(mut self) -> impl Stream<Item = Result<RawRecord, SampleError>> {
        async_stream::try_stream! {
            while let Some(record) = self.next_record().await? {
                yield record;
            }
        }
    }

    /// Classify the stream on first contact (one-time cost).
    fn resolve_layout(&mut self) -> Layout {
        if let Some(layout) = self.layout {
            return layout;
        }

        let layout = detect_layout(&self.buf);
        self.marker = boundary_marker(layout, &self.record_marker);
        self.layout = Some(layout);
        self.metrics.record_detection(layout);
        tracing::debug!(layout = layout.as_str(), "segmenter: layout detected");
        layout
    }

    fn scan(&mut self, layout: Layout) -> Scan {
        let end = match find(&self.buf, &self.marker) {
            Some(end) => end,
            None => return Scan::Incomplete,
        };

        // Consume through the end of the marker line
        let consumed = match find_newline(&self.buf[end..]) {
            Some(nl) => end + nl + 1,
            None if self.eof => self.buf.len(),
            None => return Scan::Incomplete,
        };

        // Marker leads the buffer: skip its line, nothing precedes it
        if end == 0 {
            self.buf.advance(consumed);
            return Scan::Consumed;
        }

        self.metrics.record_segmented(end);

        if self.filter.should_skip(&self.buf[..end]) {
            self.metrics.record_skipped();
            self.buf.advance(consumed);
            return Scan::Consumed;
        }

        let mut bytes = self.buf.split_to(consumed).freeze();
        bytes.truncate(end);
        Scan::Record(RawRecord::new(layout, bytes))
    }

    /// Hand out whatever is left at EOF as the final record.
    fn flush_tail(&mut self) -> Option<RawRecord> {
        if self.buf.is_empty() {
            return None;
        }

        let layout = self.resolve_layout();
        let bytes = self.buf.split().freeze();
        self.metrics.record_segmented(bytes.len());

        if self.filter.should_skip(&bytes) {
            self.metrics.record_skipped();
            return None;
        }

        tracing::trace!(len = bytes.len(), "segmenter: flushing trailing record at EOF");
        Some(RawRecord::new(layout, bytes))
    }

    async fn fill(&mut self) -> Result<(), SampleError> {
        self.buf.reserve(self.read_chunk_size);
        let n = self.reader.read_buf(&mut self.buf).await.map_err(|e| {
            tracing::error!(error = %e, "segmenter: read failed");
            e
        })?;

        if n == 0 {
            self.eof = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Duration;
    use tokio_stream::StreamExt;

    fn segmenter(input: &'static [u8], marker: &'static [u8]) -> Segmenter<Cursor<&'static [u8]>> {
        Segmenter::new(Cursor::new(input), marker, IntervalFilter::disabled())
    }

    async fn collect<R: AsyncRead + Unpin>(seg: &mut Segmenter<R>) -> Vec<RawRecord> {
        let mut records = Vec::new();
        while let Some(record) = seg.next_record().await.unwrap() {
            records.push(record);
        }
        records
    }

    const TABLE: &[u8] = b"\
+-------------------+-------+
| Variable_name     | Value |
+-------------------+-------+
| Threads_connected | 4     |
| Uptime            | 100   |
+-------------------+-------+
+-------------------+-------+
| Variable_name     | Value |
+-------------------+-------+
| Threads_connected | 5     |
| Uptime            | 110   |
+-------------------+-------+
";

    // ─── Batch ──────────────────────────────────────────────────

    #[tokio::test]
    async fn test_batch_single_record() {
        let mut seg = segmenter(b"foo\tbar\nUptime\t100\n====\n", b"====");
        let records = collect(&mut seg).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].layout, Layout::Batch);
        assert_eq!(&records[0].bytes[..], b"foo\tbar\nUptime\t100\n");
        assert_eq!(seg.layout(), Some(Layout::Batch));
    }

    #[tokio::test]
    async fn test_batch_marker_line_is_consumed_whole() {
        let input = b"a\t1\nUptime_since_flush_status\t100\nb\t2\nUptime_since_flush_status\t200\n";
        let mut seg = segmenter(input, b"Uptime_since_flush_status");
        let records = collect(&mut seg).await;

        assert_eq!(records.len(), 2);
        assert_eq!(&records[0].bytes[..], b"a\t1\n");
        assert_eq!(&records[1].bytes[..], b"b\t2\n");
    }

    #[tokio::test]
    async fn test_batch_trailing_data_flushed_at_eof() {
        let mut seg = segmenter(b"a\t1\n====\nb\t2\n", b"====");
        let records = collect(&mut seg).await;

        assert_eq!(records.len(), 2);
        assert_eq!(&records[1].bytes[..], b"b\t2\n");
    }

    #[tokio::test]
    async fn test_leading_marker_is_skipped() {
        let mut seg = segmenter(b"====\na\t1\n====\n", b"====");
        let records = collect(&mut seg).await;

        assert_eq!(records.len(), 1);
        assert_eq!(&records[0].bytes[..], b"a\t1\n");
    }

    #[tokio::test]
    async fn test_marker_without_newline_at_eof() {
        let mut seg = segmenter(b"a\t1\n====", b"====");
        let records = collect(&mut seg).await;

        assert_eq!(records.len(), 1);
        assert_eq!(&records[0].bytes[..], b"a\t1\n");
    }

    #[tokio::test]
    async fn test_empty_input() {
        let mut seg = segmenter(b"", b"====");
        assert!(seg.next_record().await.unwrap().is_none());
        assert_eq!(seg.layout(), None);
    }

    // ─── Tabular ────────────────────────────────────────────────

    #[tokio::test]
    async fn test_tabular_header_only_row() {
        let mut seg = segmenter(b"| Variable_name | Value |\n| foo | bar |\n", b"====");
        let records = collect(&mut seg).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].layout, Layout::Tabular);
        assert_eq!(&records[0].bytes[..], b"| foo | bar |\n");
    }

    #[tokio::test]
    async fn test_tabular_multiple_tables() {
        let mut seg = segmenter(TABLE, b"====");
        let records = collect(&mut seg).await;

        // Leading border, first table body, second table body
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.layout == Layout::Tabular));
        assert_eq!(&records[0].bytes[..], b"+-------------------+-------+\n");
        assert!(records[1].bytes.windows(5).any(|w| w == b"| 4  "));
        assert!(records[2].bytes.windows(5).any(|w| w == b"| 5  "));
    }

    #[tokio::test]
    async fn test_layout_is_never_re_evaluated() {
        // Starts as batch; later table-looking lines don't change the layout
        let input = b"a\t1\n====\n| Variable_name | Value |\n| b | 2 |\n====\n";
        let mut seg = segmenter(input, b"====");
        let records = collect(&mut seg).await;

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.layout == Layout::Batch));
        assert_eq!(&records[1].bytes[..], b"| Variable_name | Value |\n| b | 2 |\n");
    }

    // ─── Chunked input ──────────────────────────────────────────

    #[tokio::test]
    async fn test_marker_split_across_reads() {
        let reader = tokio_test::io::Builder::new()
            .read(b"foo\tbar\nUptime\t100\n==")
            .read(b"==\nbaz\tqux\n====\n")
            .build();
        let mut seg = Segmenter::new(reader, &b"===="[..], IntervalFilter::disabled());
        let records = collect(&mut seg).await;

        assert_eq!(records.len(), 2);
        assert_eq!(&records[0].bytes[..], b"foo\tbar\nUptime\t100\n");
        assert_eq!(&records[1].bytes[..], b"baz\tqux\n");
    }

    #[tokio::test]
    async fn test_marker_line_newline_in_next_read() {
        let reader = tokio_test::io::Builder::new()
            .read(b"a\t1\n==== trailing")
            .read(b" text\nb\t2\n")
            .build();
        let mut seg = Segmenter::new(reader, &b"===="[..], IntervalFilter::disabled());
        let records = collect(&mut seg).await;

        assert_eq!(records.len(), 2);
        assert_eq!(&records[0].bytes[..], b"a\t1\n");
        assert_eq!(&records[1].bytes[..], b"b\t2\n");
    }

    #[tokio::test]
    async fn test_small_read_chunks() {
        let mut seg = segmenter(TABLE, b"====").with_read_chunk_size(7);
        let records = collect(&mut seg).await;
        assert_eq!(records.len(), 3);
    }

    // ─── Interval filtering ─────────────────────────────────────

    #[tokio::test]
    async fn test_interval_skips_early_records() {
        let input = b"Uptime\t100\n====\nUptime\t101\n====\nUptime\t106\n====\n";
        let filter = IntervalFilter::new(Duration::from_secs(5), &b"Uptime"[..]);
        let metrics = Arc::new(PipelineMetrics::new());
        let mut seg = Segmenter::new(Cursor::new(&input[..]), &b"===="[..], filter)
            .with_metrics(Arc::clone(&metrics));
        let records = collect(&mut seg).await;

        assert_eq!(records.len(), 2);
        assert_eq!(&records[0].bytes[..], b"Uptime\t100\n");
        assert_eq!(&records[1].bytes[..], b"Uptime\t106\n");

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.records_segmented, 3);
        assert_eq!(snapshot.records_skipped, 1);
        assert_eq!(snapshot.batch_streams, 1);
    }

    #[tokio::test]
    async fn test_interval_applies_to_trailing_record() {
        let input = b"Uptime\t100\n====\nUptime\t101\n";
        let filter = IntervalFilter::new(Duration::from_secs(5), &b"Uptime"[..]);
        let mut seg = Segmenter::new(Cursor::new(&input[..]), &b"===="[..], filter);
        let records = collect(&mut seg).await;

        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_interval_tabular() {
        let filter = IntervalFilter::new(Duration::from_secs(20), &b"Uptime"[..]);
        let mut seg = Segmenter::new(Cursor::new(TABLE), &b"===="[..], filter);
        let records = collect(&mut seg).await;

        // Border (no uptime, admitted) and the first table; 110 - 100 < 20
        assert_eq!(records.len(), 2);
    }

    // ─── Failures ───────────────────────────────────────────────

    #[tokio::test]
    async fn test_read_error_is_fatal() {
        let reader = tokio_test::io::Builder::new()
            .read(b"foo\tbar\n")
            .read_error(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
            .build();
        let mut seg = Segmenter::new(reader, &b"===="[..], IntervalFilter::disabled());

        let err = seg.next_record().await.unwrap_err();
        assert!(matches!(err, SampleError::Read(_)));
    }

    #[tokio::test]
    async fn test_record_too_large() {
        let input = [b'x'; 64];
        let mut seg = Segmenter::new(Cursor::new(&input[..]), &b"===="[..], IntervalFilter::disabled())
            .with_max_record_bytes(16);

        let err = seg.next_record().await.unwrap_err();
        assert!(matches!(err, SampleError::RecordTooLarge(64, 16)));
    }

    // ─── Stream adapter ─────────────────────────────────────────

    #[tokio::test]
    async fn test_into_stream() {
        let seg = segmenter(b"a\t1\n====\nb\t2\n====\n", b"====");
        let records: Vec<_> = seg.into_stream().collect().await;

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.is_ok()));
    }

    #[tokio::test]
    async fn test_into_stream_ends_on_error() {
        let reader = tokio_test::io::Builder::new()
            .read(b"a\t1\n====\n")
            .read_error(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
            .build();
        let seg = Segmenter::new(reader, &b"===="[..], IntervalFilter::disabled());
        let records: Vec<_> = seg.into_stream().collect().await;

        assert_eq!(records.len(), 2);
        assert!(records[0].is_ok());
        assert!(records[1].is_err());
    }
}
