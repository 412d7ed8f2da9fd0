use bytes::Bytes;

use super::model::Layout;
use super::TABULAR_HEADER;

/// Classify a stream from its first bytes.
/// - Starts with `+` (table border) or `|` (table row) → Tabular
/// - Everything else → Batch
///
/// Runs ONCE per stream; the result holds for every later record.
pub fn detect_layout(prefix: &[u8]) -> Layout {
    if prefix.starts_with(b"+") || prefix.starts_with(b"|") {
        Layout::Tabular
    } else {
        Layout::Batch
    }
}

/// The boundary the segmenter scans for.
///
/// Tabular records start at the next `| Variable_name` header; batch records
/// end at the configured end-of-record marker.
pub fn boundary_marker(layout: Layout, record_marker: &Bytes) -> Bytes {
    match layout {
        Layout::Tabular => Bytes::from_static(TABULAR_HEADER),
        Layout::Batch => record_marker.clone(),
    }
}
