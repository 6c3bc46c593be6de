//! Single-sheet xlsx output of polars frames.

use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::{AnyValue, DataFrame, TimeUnit};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};
use seatek_ingest::{any_to_f64, any_to_string};
use tracing::debug;

use crate::error::OutputError;

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const MILLIS_PER_DAY: f64 = 86_400_000.0;
/// Excel serial number of 1970-01-01.
const UNIX_EPOCH_SERIAL: f64 = 25_569.0;

/// Excel serial date of a polars datetime value.
pub(crate) fn excel_serial(value: i64, unit: TimeUnit) -> f64 {
    let millis = match unit {
        TimeUnit::Nanoseconds => value as f64 / 1_000_000.0,
        TimeUnit::Microseconds => value as f64 / 1_000.0,
        TimeUnit::Milliseconds => value as f64,
    };
    millis / MILLIS_PER_DAY + UNIX_EPOCH_SERIAL
}

pub(crate) fn row_index(index: usize) -> Result<RowNum, OutputError> {
    RowNum::try_from(index).map_err(|_| OutputError::OutOfRange { what: "row", index })
}

pub(crate) fn col_index(index: usize) -> Result<ColNum, OutputError> {
    ColNum::try_from(index).map_err(|_| OutputError::OutOfRange {
        what: "column",
        index,
    })
}

/// Writes `bytes` next to `path` first and renames it into place, so readers
/// never observe a half-written file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), OutputError> {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".partial");
    let staging = PathBuf::from(staging);
    fs::write(&staging, bytes).map_err(|source| OutputError::io(&staging, source))?;
    if let Err(source) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(OutputError::io(path, source));
    }
    Ok(())
}

fn write_cell(
    sheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    value: AnyValue<'_>,
    date_format: &Format,
) -> Result<(), OutputError> {
    match value {
        AnyValue::Null => {}
        AnyValue::Datetime(value, unit, _) | AnyValue::DatetimeOwned(value, unit, _) => {
            sheet.write_number_with_format(row, col, excel_serial(value, unit), date_format)?;
        }
        AnyValue::Boolean(flag) => {
            sheet.write_boolean(row, col, flag)?;
        }
        AnyValue::String(_) | AnyValue::StringOwned(_) => {
            sheet.write_string(row, col, any_to_string(value))?;
        }
        other => match any_to_f64(other.clone()) {
            Some(number) if number.is_finite() => {
                sheet.write_number(row, col, number)?;
            }
            Some(_) => {}
            None => {
                sheet.write_string(row, col, any_to_string(other))?;
            }
        },
    }
    Ok(())
}

/// Writes `frame` as the only sheet of a new workbook at `path`.
///
/// The header row holds the column names; nulls and non-finite numbers are
/// left blank. Datetime columns are written as Excel dates.
pub fn write_frame_xlsx(path: &Path, sheet_name: &str, frame: &DataFrame) -> Result<(), OutputError> {
    let date_format = Format::new().set_num_format(DATETIME_FORMAT);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name)?;
    for (col_idx, column) in frame.get_columns().iter().enumerate() {
        let col = col_index(col_idx)?;
        sheet.write_string(0, col, column.name().as_str())?;
        for row_idx in 0..frame.height() {
            let value = column.get(row_idx).unwrap_or(AnyValue::Null);
            write_cell(sheet, row_index(row_idx + 1)?, col, value, &date_format)?;
        }
    }
    let buffer = workbook.save_to_buffer()?;
    write_atomic(path, &buffer)?;
    debug!(
        path = %path.display(),
        sheet = sheet_name,
        rows = frame.height(),
        "wrote workbook"
    );
    Ok(())
}
