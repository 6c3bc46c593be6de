pub mod error;
pub mod method;
pub mod naming;
pub mod records;

pub use error::ParseMethodError;
pub use method::{DetectionMethod, Thresholds};
pub use naming::{
    DEFAULT_DIFFERENCES_SHEET, PLOT_FILE_NAME, SUMMARY_FILE_STEM, SUMMARY_SHEET, YEAR_PAIR_COLUMN,
    corrected_file_name, is_timestamp_column, parse_sensor_label, raw_sheet_name, sensor_column,
};
pub use records::{CorrectionRecord, DifferenceRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correction_record_offsets_negate_difference() {
        let record = DifferenceRecord::new("2020-2021", 3, 0.25);
        let correction = CorrectionRecord::from_difference(&record, "out/a_2020_corrected.xlsx");
        assert_eq!(correction.offset_applied, -0.25);
        assert_eq!(correction.original_difference, 0.25);
        assert_eq!(correction.sensor_id, 3);
        assert_eq!(correction.year_pair, "2020-2021");
    }

    #[test]
    fn method_names_round_trip_through_display() {
        for method in DetectionMethod::ALL {
            let parsed: DetectionMethod = method.to_string().parse().expect("parse method");
            assert_eq!(parsed, method);
        }
    }
}
