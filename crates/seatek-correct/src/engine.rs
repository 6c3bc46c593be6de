use std::collections::BTreeMap;
use std::path::PathBuf;

use seatek_ingest::WorkbookSource;
use seatek_model::{CorrectionRecord, DifferenceRecord, corrected_file_name, sensor_column};
use seatek_output::write_frame_xlsx;
use tracing::{debug, info, warn};

use crate::error::CorrectionError;
use crate::table::RawSensorTable;
use crate::year_pair::target_year;

/// Correction state of one target year.
#[derive(Debug, Clone)]
struct YearCorrections {
    pristine: RawSensorTable,
    /// Latest offset per sensor id.
    offsets: BTreeMap<u32, f64>,
    corrected: RawSensorTable,
}

/// Applies outlier corrections and writes one corrected workbook per year.
///
/// Each year's output is rebuilt from its pristine sheet with the latest
/// offset of every corrected sensor. A later outlier for the same sensor
/// replaces the earlier offset, so a column never carries more than one.
pub struct CorrectionEngine {
    output_dir: PathBuf,
    input_stem: String,
    years: BTreeMap<i32, YearCorrections>,
}

impl CorrectionEngine {
    /// `input_stem` is the input workbook's file name without extension.
    pub fn new(output_dir: impl Into<PathBuf>, input_stem: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            input_stem: input_stem.into(),
            years: BTreeMap::new(),
        }
    }

    /// Path of the corrected workbook for `year`.
    pub fn output_path(&self, year: i32) -> PathBuf {
        self.output_dir
            .join(corrected_file_name(&self.input_stem, year))
    }

    /// Corrected table of `year`, if any correction for it succeeded.
    pub fn corrected_table(&self, year: i32) -> Option<&RawSensorTable> {
        self.years.get(&year).map(|state| &state.corrected)
    }

    /// Corrects one outlier.
    ///
    /// The file is written only after the in-memory correction succeeded, and
    /// a failure leaves previously corrected tables untouched.
    pub fn correct(
        &mut self,
        record: &DifferenceRecord,
        source: &impl WorkbookSource,
    ) -> Result<CorrectionRecord, CorrectionError> {
        let year = target_year(&record.year_pair)?;
        let (pristine, mut offsets) = match self.years.get(&year) {
            Some(state) => (state.pristine.clone(), state.offsets.clone()),
            None => (RawSensorTable::load(source, year)?, BTreeMap::new()),
        };
        if !pristine.has_sensor(record.sensor_id) {
            return Err(CorrectionError::MissingSensorColumn {
                sheet: pristine.sheet_name,
                column: sensor_column(record.sensor_id),
            });
        }
        let correction = CorrectionRecord::from_difference(record, self.output_path(year));
        if let Some(previous) = offsets.insert(record.sensor_id, correction.offset_applied) {
            warn!(
                sheet = %pristine.sheet_name,
                column = %sensor_column(record.sensor_id),
                previous,
                offset = correction.offset_applied,
                "sensor already corrected, replacing earlier offset"
            );
        }

        let mut table = pristine.clone();
        for (sensor_id, offset) in &offsets {
            table.apply_offset(*sensor_id, *offset)?;
        }
        debug!(
            sheet = %table.sheet_name,
            column = %sensor_column(record.sensor_id),
            offset = correction.offset_applied,
            "applied offset"
        );

        write_frame_xlsx(&correction.corrected_file, &table.sheet_name, &table.data).map_err(
            |source| CorrectionError::Write {
                path: correction.corrected_file.clone(),
                source,
            },
        )?;
        info!(
            year_pair = %record.year_pair,
            sensor = record.sensor_id,
            offset = correction.offset_applied,
            path = %correction.corrected_file.display(),
            "saved corrected data"
        );
        self.years.insert(
            year,
            YearCorrections {
                pristine,
                offsets,
                corrected: table,
            },
        );
        Ok(correction)
    }
}
