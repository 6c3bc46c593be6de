//! Correction of raw sensor readings for detected year-to-year outliers.
//!
//! For an outlier `(year_pair, sensor, difference)` the engine loads the
//! `Raw Data {year}` sheet of the first year named in the label, shifts the
//! sensor's `V{sensor}` column by `-difference` and writes the result as a new
//! workbook. The input workbook is never modified.

pub mod engine;
pub mod error;
pub mod table;
pub mod year_pair;

pub use engine::CorrectionEngine;
pub use error::CorrectionError;
pub use table::RawSensorTable;
pub use year_pair::{target_year, year_tokens};
