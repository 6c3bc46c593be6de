//! Wide-to-long reshaping of the year-to-year differences sheet.
//!
//! The sheet has one row per year-pair label (column `Year_Pair`) and one
//! column per sensor (`Sensor 1`, `Sensor 2`, ...). Every (year-pair, sensor)
//! cell becomes one [`DifferenceRecord`], including empty cells, which carry
//! `NaN` so the detector decides how to treat them.

use polars::prelude::{AnyValue, DataFrame};
use seatek_model::{DifferenceRecord, YEAR_PAIR_COLUMN, parse_sensor_label};
use tracing::{info, warn};

use crate::error::IngestError;
use crate::polars_utils::{any_to_f64, any_to_string};
use crate::workbook::WorkbookSource;

/// Melts the differences frame into records, sensor column by sensor column.
///
/// Columns whose header does not end in a sensor number are not sensor data
/// and are left out with a warning.
pub fn melt_differences(
    sheet: &str,
    frame: &DataFrame,
) -> Result<Vec<DifferenceRecord>, IngestError> {
    let pairs = frame
        .column(YEAR_PAIR_COLUMN)
        .map_err(|_| IngestError::MissingColumn {
            sheet: sheet.to_string(),
            column: YEAR_PAIR_COLUMN.to_string(),
        })?;
    let labels: Vec<String> = (0..frame.height())
        .map(|idx| any_to_string(pairs.get(idx).unwrap_or(AnyValue::Null)))
        .collect();

    let mut records = Vec::with_capacity(frame.height() * frame.width().saturating_sub(1));
    for column in frame.get_columns() {
        let name = column.name().as_str();
        if name == YEAR_PAIR_COLUMN {
            continue;
        }
        let Some(sensor_id) = parse_sensor_label(name) else {
            warn!(sheet, column = name, "ignoring column without a sensor number");
            continue;
        };
        for (idx, label) in labels.iter().enumerate() {
            let difference = column
                .get(idx)
                .ok()
                .and_then(any_to_f64)
                .unwrap_or(f64::NAN);
            records.push(DifferenceRecord::new(label.clone(), sensor_id, difference));
        }
    }
    Ok(records)
}

/// Loads the differences sheet from a workbook and melts it.
pub fn load_differences(
    workbook: &impl WorkbookSource,
    sheet: &str,
) -> Result<Vec<DifferenceRecord>, IngestError> {
    let frame = workbook.read_sheet(sheet)?;
    let records = melt_differences(sheet, &frame)?;
    info!(
        sheet,
        year_pairs = frame.height(),
        records = records.len(),
        "reshaped year-to-year differences"
    );
    Ok(records)
}
