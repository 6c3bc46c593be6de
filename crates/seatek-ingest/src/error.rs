use std::path::PathBuf;

use polars::prelude::PolarsError;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to open workbook {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("sheet '{sheet}' not found in workbook")]
    MissingSheet { sheet: String },

    #[error("failed to read sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    #[error("sheet '{sheet}' has no header row")]
    EmptySheet { sheet: String },

    #[error("sheet '{sheet}' is missing required column '{column}'")]
    MissingColumn { sheet: String, column: String },

    #[error("failed to build frame for sheet '{sheet}': {source}")]
    Frame {
        sheet: String,
        #[source]
        source: PolarsError,
    },
}

impl IngestError {
    pub(crate) fn frame(sheet: &str, source: PolarsError) -> Self {
        Self::Frame {
            sheet: sheet.to_string(),
            source,
        }
    }
}
