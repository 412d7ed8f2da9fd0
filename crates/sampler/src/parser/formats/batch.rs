use crate::parser::scan::lines;
use crate::parser::traits::*;

/// Parser for `mysql --batch` output: one `key<TAB>value` pair per line.
pub struct BatchParser;

impl RecordParser for BatchParser {
    fn parse(&self, record: &[u8]) -> ParsedRecord {
        let mut parsed = ParsedRecord::default();

        for line in lines(record) {
            if line.is_empty() {
                continue;
            }

            // Exactly two fields, anything else is noise
            let mut fields = line.split(|&b| b == b'\t');
            let (key, value) = match (fields.next(), fields.next(), fields.next()) {
                (Some(key), Some(value), None) => (key, value),
                _ => {
                    tracing::trace!(line = %String::from_utf8_lossy(line), "batch: wrong field count");
                    parsed.discarded_lines += 1;
                    continue;
                }
            };

            let key = String::from_utf8_lossy(key);
            if key.trim().is_empty() {
                parsed.discarded_lines += 1;
                continue;
            }

            parsed.sample.insert(&key, String::from_utf8_lossy(value).into_owned());
        }

        parsed
    }

    fn layout(&self) -> Layout {
        Layout::Batch
    }
}
