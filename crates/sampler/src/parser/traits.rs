pub use super::model::{Layout, ParsedRecord, RawRecord, Sample};

pub trait RecordParser: Send + Sync {
    /// Parse one record's lines into a sample.
    ///
    /// Best effort: lines that don't fit the layout are skipped (and
    /// counted), so the resulting sample may be empty.
    fn parse(&self, record: &[u8]) -> ParsedRecord;
    fn layout(&self) -> Layout;
}
