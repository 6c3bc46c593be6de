use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One cell of the differences sheet: the change of one sensor between two years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferenceRecord {
    /// Year-pair label as written in the workbook, e.g. `2019-2020`.
    pub year_pair: String,
    pub sensor_id: u32,
    /// Signed difference in the unit of the raw readings. `NaN` when the cell was empty.
    pub difference: f64,
}

impl DifferenceRecord {
    pub fn new(year_pair: impl Into<String>, sensor_id: u32, difference: f64) -> Self {
        Self {
            year_pair: year_pair.into(),
            sensor_id,
            difference,
        }
    }

    /// Tick label used on the outlier plot, e.g. `2019-2020/S3`.
    pub fn plot_label(&self) -> String {
        format!("{}/S{}", self.year_pair, self.sensor_id)
    }
}

/// Audit trail entry for one applied correction.
///
/// Serialized field names match the columns of the corrections summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    #[serde(rename = "Year_Pair")]
    pub year_pair: String,
    #[serde(rename = "Sensor")]
    pub sensor_id: u32,
    #[serde(rename = "OrigDiff")]
    pub original_difference: f64,
    #[serde(rename = "OffsetApplied")]
    pub offset_applied: f64,
    #[serde(rename = "CorrectedFile")]
    pub corrected_file: PathBuf,
}

impl CorrectionRecord {
    /// Column headers of the corrections summary, in order.
    pub const COLUMNS: [&'static str; 5] = [
        "Year_Pair",
        "Sensor",
        "OrigDiff",
        "OffsetApplied",
        "CorrectedFile",
    ];

    /// Builds the record for a corrected outlier. The offset is always the
    /// negated difference.
    pub fn from_difference(record: &DifferenceRecord, corrected_file: impl Into<PathBuf>) -> Self {
        Self {
            year_pair: record.year_pair.clone(),
            sensor_id: record.sensor_id,
            original_difference: record.difference,
            offset_applied: -record.difference,
            corrected_file: corrected_file.into(),
        }
    }
}
