//! Run driver and record sinks

pub mod driver;
pub mod sink;

pub use driver::{BucketReport, RunReport, TransformDriver, BUCKETS};
pub use sink::{CollectingSink, NdjsonSink, RecordSink};
