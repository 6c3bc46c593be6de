//! Corrections summary: one row per applied correction.

use std::fmt;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use seatek_model::{CorrectionRecord, SUMMARY_FILE_STEM, SUMMARY_SHEET};
use tracing::info;

use crate::error::OutputError;
use crate::xlsx::{col_index, row_index, write_atomic};

/// File format of the corrections summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryFormat {
    #[default]
    Xlsx,
    Csv,
}

impl SummaryFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for SummaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Location of the summary inside `output_dir` for the given format.
pub fn summary_path(output_dir: &Path, format: SummaryFormat) -> PathBuf {
    output_dir.join(format!("{SUMMARY_FILE_STEM}.{}", format.extension()))
}

/// Writes the summary and returns its path. The header row is written even
/// when no correction was applied.
pub fn write_corrections_summary(
    output_dir: &Path,
    records: &[CorrectionRecord],
    format: SummaryFormat,
) -> Result<PathBuf, OutputError> {
    let path = summary_path(output_dir, format);
    let bytes = match format {
        SummaryFormat::Xlsx => summary_xlsx(records)?,
        SummaryFormat::Csv => summary_csv(records)?,
    };
    write_atomic(&path, &bytes)?;
    info!(path = %path.display(), rows = records.len(), "saved corrections summary");
    Ok(path)
}

fn summary_xlsx(records: &[CorrectionRecord]) -> Result<Vec<u8>, OutputError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SUMMARY_SHEET)?;
    for (idx, name) in CorrectionRecord::COLUMNS.iter().enumerate() {
        sheet.write_string(0, col_index(idx)?, *name)?;
    }
    for (idx, record) in records.iter().enumerate() {
        let row = row_index(idx + 1)?;
        sheet.write_string(row, 0, record.year_pair.as_str())?;
        sheet.write_number(row, 1, record.sensor_id)?;
        sheet.write_number(row, 2, record.original_difference)?;
        sheet.write_number(row, 3, record.offset_applied)?;
        sheet.write_string(row, 4, record.corrected_file.display().to_string())?;
    }
    Ok(workbook.save_to_buffer()?)
}

fn summary_csv(records: &[CorrectionRecord]) -> Result<Vec<u8>, OutputError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(CorrectionRecord::COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|error| OutputError::Csv(error.into_error().into()))
}
