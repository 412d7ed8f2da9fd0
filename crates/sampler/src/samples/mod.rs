//! Samples module — segmentation, interval filtering and publishing.

pub mod error;
pub mod interval;
pub mod publish;
pub mod segment;

pub use error::SampleError;
pub use interval::IntervalFilter;
pub use publish::{run, spawn};
pub use segment::Segmenter;
