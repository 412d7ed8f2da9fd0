/// Status record parsing
///
/// This module turns the raw text of one `SHOW GLOBAL STATUS` snapshot into
/// a flat, lowercase-keyed [`Sample`].
///
/// # Architecture
///
/// - `model.rs`: Layout, RawRecord, Sample
/// - `traits.rs`: The `RecordParser` trait
/// - `detector.rs`: One-shot layout classification and boundary markers
/// - `formats/`: Batch and tabular parsers
/// - `scan.rs`: Byte search and trimming helpers
/// - `metrics.rs`: Pipeline counters
///
/// # Best effort
///
/// Parsers never fail. Lines that don't fit the layout are skipped and
/// counted; a record with no usable lines yields an empty sample.

pub mod traits;
pub mod detector;
pub mod metrics;
pub mod formats;
pub mod model;
pub mod scan;

// Re-export commonly used types
pub use traits::RecordParser;
pub use model::{Layout, ParsedRecord, RawRecord, Sample};
pub use formats::get_parser;

// Constants
/// Header label that opens every tabular record
pub const TABULAR_HEADER: &[u8] = b"| Variable_name";
/// Last variable printed by `SHOW GLOBAL STATUS`, closes every batch record
pub const DEFAULT_RECORD_MARKER: &str = "Uptime_since_flush_status";
pub const DEFAULT_UPTIME_LABEL: &str = "Uptime";
