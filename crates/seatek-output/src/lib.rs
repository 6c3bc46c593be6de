pub mod error;
pub mod summary;
pub mod xlsx;

pub use error::OutputError;
pub use summary::{SummaryFormat, summary_path, write_corrections_summary};
pub use xlsx::{write_atomic, write_frame_xlsx};
