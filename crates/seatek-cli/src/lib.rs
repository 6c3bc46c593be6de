//! Library side of the outlier CLI: logging setup and the batch pipeline.

pub mod logging;
pub mod pipeline;

pub use pipeline::{RunConfig, RunOutcome, SkippedOutlier, run};
