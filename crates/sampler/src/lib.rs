// Module structure for the status sampler.

// Core infrastructure
pub mod parser;
pub mod conf;

// Domain modules
pub mod samples;
pub mod runtime;

pub use conf::SamplerConfig;
pub use parser::{Layout, RawRecord, Sample};
pub use samples::{SampleError, Segmenter};
