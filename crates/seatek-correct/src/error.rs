use std::path::PathBuf;

use polars::prelude::PolarsError;
use seatek_ingest::IngestError;
use seatek_output::OutputError;

/// Why one outlier could not be corrected. None of these abort a run.
#[derive(Debug, thiserror::Error)]
pub enum CorrectionError {
    #[error("year-pair label '{label}' has {found} four-digit year(s), expected 2")]
    MalformedYearPairLabel { label: String, found: usize },

    #[error("raw-data sheet '{sheet}' is missing or unreadable: {source}")]
    MissingOrUnreadableSheet {
        sheet: String,
        #[source]
        source: IngestError,
    },

    #[error("sheet '{sheet}' has no sensor column '{column}'")]
    MissingSensorColumn { sheet: String, column: String },

    #[error("sensor column '{column}' of sheet '{sheet}' has a non-numeric value at row {row}")]
    NonNumericSensorColumn {
        sheet: String,
        column: String,
        row: usize,
    },

    #[error("failed to update sheet '{sheet}': {source}")]
    Frame {
        sheet: String,
        #[source]
        source: PolarsError,
    },

    #[error("failed to write corrected workbook {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: OutputError,
    },
}
