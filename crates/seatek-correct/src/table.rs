use polars::prelude::{AnyValue, DataFrame, IntoColumn, NamedFrom, Series};
use seatek_ingest::{WorkbookSource, any_to_f64};
use seatek_model::{is_timestamp_column, raw_sheet_name, sensor_column};
use tracing::debug;

use crate::error::CorrectionError;

/// Raw readings of one year, as loaded from its `Raw Data {year}` sheet.
#[derive(Debug, Clone)]
pub struct RawSensorTable {
    pub year: i32,
    pub sheet_name: String,
    pub data: DataFrame,
    /// Name of the trailing timestamp column removed on load, if any.
    pub dropped_column: Option<String>,
}

impl RawSensorTable {
    /// Wraps a frame, dropping a trailing timestamp-like column.
    pub fn new(year: i32, data: DataFrame) -> Result<Self, CorrectionError> {
        let sheet_name = raw_sheet_name(year);
        let trailing = data
            .get_column_names()
            .last()
            .map(ToString::to_string)
            .filter(|name| is_timestamp_column(name));
        let data = match &trailing {
            Some(name) => {
                debug!(sheet = %sheet_name, column = %name, "dropping timestamp column");
                data.drop(name).map_err(|source| CorrectionError::Frame {
                    sheet: sheet_name.clone(),
                    source,
                })?
            }
            None => data,
        };
        Ok(Self {
            year,
            sheet_name,
            data,
            dropped_column: trailing,
        })
    }

    /// Reads the raw-data sheet of `year` from a workbook.
    pub fn load(source: &impl WorkbookSource, year: i32) -> Result<Self, CorrectionError> {
        let sheet = raw_sheet_name(year);
        let data = source
            .read_sheet(&sheet)
            .map_err(|source| CorrectionError::MissingOrUnreadableSheet {
                sheet: sheet.clone(),
                source,
            })?;
        Self::new(year, data)
    }

    pub fn has_sensor(&self, sensor_id: u32) -> bool {
        self.data.column(&sensor_column(sensor_id)).is_ok()
    }

    /// Values of a sensor column as floats; `None` for empty cells.
    pub fn sensor_values(&self, sensor_id: u32) -> Result<Vec<Option<f64>>, CorrectionError> {
        let column_name = sensor_column(sensor_id);
        let column = self
            .data
            .column(&column_name)
            .map_err(|_| CorrectionError::MissingSensorColumn {
                sheet: self.sheet_name.clone(),
                column: column_name.clone(),
            })?;
        (0..self.data.height())
            .map(|row| {
                let value = column.get(row).unwrap_or(AnyValue::Null);
                if matches!(value, AnyValue::Null) {
                    return Ok(None);
                }
                match any_to_f64(value) {
                    Some(number) => Ok(Some(number)),
                    None => Err(CorrectionError::NonNumericSensorColumn {
                        sheet: self.sheet_name.clone(),
                        column: column_name.clone(),
                        row,
                    }),
                }
            })
            .collect()
    }

    /// Adds `offset` to every reading of one sensor. Empty cells stay empty.
    ///
    /// On error the table is left unchanged.
    pub fn apply_offset(&mut self, sensor_id: u32, offset: f64) -> Result<(), CorrectionError> {
        let shifted: Vec<Option<f64>> = self
            .sensor_values(sensor_id)?
            .into_iter()
            .map(|value| value.map(|v| v + offset))
            .collect();
        let series = Series::new(sensor_column(sensor_id).into(), shifted);
        self.data
            .with_column(series.into_column())
            .map_err(|source| CorrectionError::Frame {
                sheet: self.sheet_name.clone(),
                source,
            })?;
        Ok(())
    }
}
