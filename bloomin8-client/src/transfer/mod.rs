//! Upload progress and throughput helpers.

pub mod progress;
pub mod progress_stream;
