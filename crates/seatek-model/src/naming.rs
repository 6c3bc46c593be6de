//! Fixed naming conventions of the Seatek analysis workbook and its outputs.

/// Default name of the sheet holding the wide year-to-year differences table.
pub const DEFAULT_DIFFERENCES_SHEET: &str = "Year-to-Year Differences";

/// Key column of the differences sheet.
pub const YEAR_PAIR_COLUMN: &str = "Year_Pair";

/// File stem of the corrections summary (extension depends on the format).
pub const SUMMARY_FILE_STEM: &str = "corrections_summary";

/// Sheet name used inside the xlsx corrections summary.
pub const SUMMARY_SHEET: &str = "Corrections";

pub const PLOT_FILE_NAME: &str = "outliers_plot.png";

/// Sheet holding the raw readings of one year.
pub fn raw_sheet_name(year: i32) -> String {
    format!("Raw Data {year}")
}

/// Value column of a sensor inside a raw-data sheet.
pub fn sensor_column(sensor_id: u32) -> String {
    format!("V{sensor_id}")
}

/// File name of the corrected copy of one year's raw data.
pub fn corrected_file_name(input_stem: &str, year: i32) -> String {
    format!("{input_stem}_{year}_corrected.xlsx")
}

/// True when a column name looks like a timestamp (`Time`, `Timestamp`, `datetime`, ...).
pub fn is_timestamp_column(name: &str) -> bool {
    name.to_lowercase().contains("time")
}

/// Extracts the sensor id from a differences-sheet header such as `Sensor 3`.
///
/// The id is the last whitespace-separated token; bare numbers are accepted too.
pub fn parse_sensor_label(label: &str) -> Option<u32> {
    let token = label.split_whitespace().last()?;
    token.parse::<u32>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_labels() {
        assert_eq!(parse_sensor_label("Sensor 3"), Some(3));
        assert_eq!(parse_sensor_label("  Sensor   12 "), Some(12));
        assert_eq!(parse_sensor_label("7"), Some(7));
        assert_eq!(parse_sensor_label("Sensor"), None);
        assert_eq!(parse_sensor_label("Sensor 0"), None);
        assert_eq!(parse_sensor_label(""), None);
    }

    #[test]
    fn timestamp_detection_is_case_insensitive() {
        assert!(is_timestamp_column("Timestamp"));
        assert!(is_timestamp_column("TIME"));
        assert!(is_timestamp_column("datetime_utc"));
        assert!(!is_timestamp_column("V5"));
    }

    #[test]
    fn output_names() {
        assert_eq!(raw_sheet_name(2020), "Raw Data 2020");
        assert_eq!(sensor_column(3), "V3");
        assert_eq!(
            corrected_file_name("Series27", 2020),
            "Series27_2020_corrected.xlsx"
        );
    }
}
