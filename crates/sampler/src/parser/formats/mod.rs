/// Per-layout record parsers

pub mod batch;
pub mod tabular;

pub use batch::BatchParser;
pub use tabular::TabularParser;

use super::traits::{Layout, RecordParser};

/// Get the parser for a detected layout.
pub fn get_parser(layout: Layout) -> Box<dyn RecordParser> {
    match layout {
        Layout::Batch => Box::new(BatchParser),
        Layout::Tabular => Box::new(TabularParser),
    }
}
