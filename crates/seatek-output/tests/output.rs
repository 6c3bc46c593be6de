//! Tests for xlsx and csv outputs.

use std::fs;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series, TimeUnit};
use seatek_model::{CorrectionRecord, DifferenceRecord};
use seatek_output::{SummaryFormat, summary_path, write_corrections_summary, write_frame_xlsx};
use tempfile::TempDir;

fn read_range(path: &Path, sheet: &str) -> calamine::Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("open written workbook");
    workbook.worksheet_range(sheet).expect("read sheet")
}

fn sample_record() -> CorrectionRecord {
    let difference = DifferenceRecord::new("2020-2021", 3, 0.25);
    CorrectionRecord::from_difference(&difference, "out/a_2020_corrected.xlsx")
}

#[test]
fn frame_round_trips_through_xlsx() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frame.xlsx");
    let columns: Vec<Column> = vec![
        Series::new("V1".into(), vec![Some(1.5), None, Some(-2.0)]).into_column(),
        Series::new("Label".into(), vec!["a", "b", "c"]).into_column(),
    ];
    let frame = DataFrame::new(columns).unwrap();

    write_frame_xlsx(&path, "Raw Data 2020", &frame).expect("write frame");

    let range = read_range(&path, "Raw Data 2020");
    assert_eq!(range.get_size(), (4, 2));
    assert_eq!(range.get_value((0, 0)), Some(&Data::String("V1".into())));
    assert_eq!(range.get_value((1, 0)), Some(&Data::Float(1.5)));
    assert_eq!(range.get_value((2, 0)), Some(&Data::Empty));
    assert_eq!(range.get_value((3, 1)), Some(&Data::String("c".into())));
    assert!(!dir.path().join("frame.xlsx.partial").exists());
}

#[test]
fn datetime_columns_are_written_as_dates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dates.xlsx");
    let recorded = Series::new("Recorded".into(), vec![Some(1_704_110_400_000_i64), None])
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
        .unwrap();
    let columns: Vec<Column> = vec![
        recorded.into_column(),
        Series::new("V1".into(), vec![1.0, 2.0]).into_column(),
    ];
    let frame = DataFrame::new(columns).unwrap();

    write_frame_xlsx(&path, "Raw Data 2024", &frame).expect("write frame");

    let range = read_range(&path, "Raw Data 2024");
    match range.get_value((1, 0)) {
        Some(Data::DateTime(value)) => assert_eq!(value.as_f64(), 45292.5),
        other => panic!("expected a date cell, got {other:?}"),
    }
    assert_eq!(range.get_value((2, 0)), Some(&Data::Empty));
}

#[test]
fn xlsx_summary_has_header_and_rows() {
    let dir = TempDir::new().unwrap();

    let path = write_corrections_summary(dir.path(), &[sample_record()], SummaryFormat::Xlsx)
        .expect("write summary");

    assert_eq!(path, dir.path().join("corrections_summary.xlsx"));
    let range = read_range(&path, "Corrections");
    let header: Vec<String> = (0..5)
        .map(|col| range.get_value((0, col)).map(ToString::to_string).unwrap_or_default())
        .collect();
    assert_eq!(header, CorrectionRecord::COLUMNS);
    assert_eq!(range.get_value((1, 0)), Some(&Data::String("2020-2021".into())));
    assert_eq!(range.get_value((1, 1)), Some(&Data::Float(3.0)));
    assert_eq!(range.get_value((1, 2)), Some(&Data::Float(0.25)));
    assert_eq!(range.get_value((1, 3)), Some(&Data::Float(-0.25)));
}

#[test]
fn empty_xlsx_summary_still_has_header() {
    let dir = TempDir::new().unwrap();

    let path = write_corrections_summary(dir.path(), &[], SummaryFormat::Xlsx).expect("write");

    let range = read_range(&path, "Corrections");
    assert_eq!(range.get_size(), (1, 5));
}

#[test]
fn csv_summary_serializes_records() {
    let dir = TempDir::new().unwrap();

    let path = write_corrections_summary(dir.path(), &[sample_record()], SummaryFormat::Csv)
        .expect("write summary");

    assert_eq!(path, summary_path(dir.path(), SummaryFormat::Csv));
    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(
        contents,
        "Year_Pair,Sensor,OrigDiff,OffsetApplied,CorrectedFile\n\
         2020-2021,3,0.25,-0.25,out/a_2020_corrected.xlsx\n"
    );
}
