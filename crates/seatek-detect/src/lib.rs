pub mod detector;
pub mod error;
pub mod stats;

pub use detector::{detect, detect_named};
pub use error::DetectError;
pub use stats::{Summary, quantile};
