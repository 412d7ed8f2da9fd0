//! Error — fatal pipeline failures.
//!
//! Per-line and per-record problems are never errors; they are skipped and
//! counted. Only failures that stop the whole stream live here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SampleError {
    #[error("Read failed: {0}")]
    Read(#[from] std::io::Error),
    #[error("Record too large: {0} bytes buffered without a boundary (max: {1} bytes)")]
    RecordTooLarge(usize, usize),
}
