//! End-to-end tests of the batch pipeline over a generated workbook.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Workbook, Worksheet};
use seatek_cli::pipeline::plot_path;
use seatek_cli::{RunConfig, run};
use seatek_model::{DetectionMethod, Thresholds};
use seatek_output::SummaryFormat;
use tempfile::TempDir;

const DIFFERENCES: [(&str, [Option<f64>; 3]); 4] = [
    ("2019-2020", [Some(0.01), Some(0.02), Some(-0.03)]),
    ("2020-2021", [Some(0.02), Some(-0.01), Some(0.25)]),
    ("2019-2020-2021", [Some(0.5), Some(0.0), Some(0.0)]),
    ("2022-2023", [Some(0.0), Some(-0.4), None]),
];

fn write_raw_sheet(sheet: &mut Worksheet, name: &str, base: f64) {
    sheet.set_name(name).unwrap();
    for (col, header) in ["V1", "V2", "V3", "Timestamp"].iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for row in 1..=3u32 {
        for col in 0..3u16 {
            let value = base + f64::from(col) * 10.0 + f64::from(row);
            sheet.write_number(row, col, value).unwrap();
        }
        sheet
            .write_string(row, 3, format!("2020-01-0{row} 00:00"))
            .unwrap();
    }
}

fn write_input(dir: &Path) -> PathBuf {
    let path = dir.join("Series27.xlsx");
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Year-to-Year Differences").unwrap();
        for (col, header) in ["Year_Pair", "Sensor 1", "Sensor 2", "Sensor 3"]
            .iter()
            .enumerate()
        {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        for (idx, (label, values)) in DIFFERENCES.iter().enumerate() {
            let row = idx as u32 + 1;
            sheet.write_string(row, 0, *label).unwrap();
            for (col, value) in values.iter().enumerate() {
                if let Some(value) = value {
                    sheet.write_number(row, col as u16 + 1, *value).unwrap();
                }
            }
        }
    }
    write_raw_sheet(workbook.add_worksheet(), "Raw Data 2019", 100.0);
    write_raw_sheet(workbook.add_worksheet(), "Raw Data 2020", 200.0);
    workbook.save(&path).unwrap();
    path
}

fn config(input: &Path, output: &Path) -> RunConfig {
    RunConfig {
        output_dir: output.to_path_buf(),
        plot: false,
        ..RunConfig::new(input)
    }
}

fn read_sheet(path: &Path, sheet: &str) -> calamine::Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("open output workbook");
    workbook.worksheet_range(sheet).expect("read output sheet")
}

#[test]
fn abs_run_corrects_valid_outliers_and_skips_the_rest() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join("out");

    let outcome = run(&config(&input, &output)).expect("run");

    let flagged: Vec<String> = outcome
        .outliers
        .iter()
        .map(seatek_model::DifferenceRecord::plot_label)
        .collect();
    assert_eq!(
        flagged,
        vec!["2019-2020-2021/S1", "2022-2023/S2", "2020-2021/S3"]
    );
    assert_eq!(outcome.skipped.len(), 2);
    assert_eq!(outcome.corrections.len(), 1);

    let correction = &outcome.corrections[0];
    assert_eq!(correction.year_pair, "2020-2021");
    assert_eq!(correction.sensor_id, 3);
    assert_eq!(correction.original_difference, 0.25);
    assert_eq!(correction.offset_applied, -0.25);
    assert_eq!(
        correction.corrected_file,
        output.join("Series27_2020_corrected.xlsx")
    );
    assert!(outcome.plot_path.is_none());
}

#[test]
fn corrected_workbook_shifts_only_the_flagged_sensor() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join("out");

    run(&config(&input, &output)).expect("run");

    let range = read_sheet(&output.join("Series27_2020_corrected.xlsx"), "Raw Data 2020");
    assert_eq!(range.width(), 3);
    assert_eq!(range.get_value((0, 2)), Some(&Data::String("V3".into())));
    for row in 1..=3u32 {
        let original_v1 = 200.0 + f64::from(row);
        let original_v3 = 220.0 + f64::from(row);
        assert_eq!(range.get_value((row, 0)), Some(&Data::Float(original_v1)));
        assert_eq!(
            range.get_value((row, 2)),
            Some(&Data::Float(original_v3 - 0.25))
        );
    }
    assert!(!output.join("Series27_2019_corrected.xlsx").exists());
    assert!(!output.join("Series27_2022_corrected.xlsx").exists());
}

#[test]
fn summary_lists_applied_corrections() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join("out");

    let outcome = run(&config(&input, &output)).expect("run");

    assert_eq!(outcome.summary_path, output.join("corrections_summary.xlsx"));
    let range = read_sheet(&outcome.summary_path, "Corrections");
    assert_eq!(range.get_size(), (2, 5));
    assert_eq!(range.get_value((1, 0)), Some(&Data::String("2020-2021".into())));
    assert_eq!(range.get_value((1, 1)), Some(&Data::Float(3.0)));
    assert_eq!(range.get_value((1, 3)), Some(&Data::Float(-0.25)));
}

#[test]
fn repeated_runs_produce_identical_summaries() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join("out");
    let mut config = config(&input, &output);
    config.summary_format = SummaryFormat::Csv;

    let first = run(&config).expect("first run");
    let first_summary = fs::read_to_string(&first.summary_path).unwrap();
    let second = run(&config).expect("second run");
    let second_summary = fs::read_to_string(&second.summary_path).unwrap();

    assert_eq!(first.corrections, second.corrections);
    assert_eq!(first_summary, second_summary);
}

#[test]
fn iqr_and_zscore_runs_complete() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path());

    for method in [DetectionMethod::Zscore, DetectionMethod::Iqr] {
        let output = dir.path().join(method.as_str());
        let config = RunConfig {
            method,
            thresholds: Thresholds::default().with_zscore_threshold(1.0),
            ..config(&input, &output)
        };
        let outcome = run(&config).expect("run");
        assert!(outcome.summary_path.exists());
        assert_eq!(
            outcome.corrections.len() + outcome.skipped.len(),
            outcome.outliers.len()
        );
    }
}

#[test]
fn missing_input_is_fatal_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");

    let result = run(&config(&dir.path().join("absent.xlsx"), &output));

    assert!(result.is_err());
    assert!(!output.exists());
}

#[test]
fn missing_differences_sheet_is_fatal() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path());
    let config = RunConfig {
        differences_sheet: "Differences".to_string(),
        ..config(&input, &dir.path().join("out"))
    };

    let error = run(&config).unwrap_err();

    assert!(format!("{error:#}").contains("Differences"));
}

#[test]
fn plot_path_is_inside_output_dir() {
    assert_eq!(
        plot_path(Path::new("out")),
        PathBuf::from("out/outliers_plot.png")
    );
}
