//! Batch pipeline: decode, analyze, record.

pub mod batch;
pub mod decode;

pub use batch::{run_batch, BatchReport};
pub use decode::decode;
