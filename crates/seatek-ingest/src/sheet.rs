//! Conversion of calamine worksheet ranges into polars frames.
//!
//! The first row of the used range is the header. A column whose non-empty
//! cells are all numeric becomes `Float64`, one holding only date cells
//! becomes a millisecond `Datetime`, and anything else becomes `String`.
//! Empty and error cells are null.

use std::collections::BTreeMap;

use calamine::{Data, Range};
use polars::prelude::{
    Column, DataFrame, DataType, IntoColumn, NamedFrom, PolarsResult, Series, TimeUnit,
};

use crate::error::IngestError;
use crate::polars_utils::format_numeric;

/// Cell content after normalization.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Empty,
    Number(f64),
    /// Milliseconds since the Unix epoch, plus the text used in mixed columns.
    DateTime { millis: i64, text: String },
    Text(String),
}

fn normalize(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Float(v) => Cell::Number(*v),
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) if dt.is_duration() => Cell::Text(format_numeric(dt.as_f64())),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::DateTime {
                millis: value.and_utc().timestamp_millis(),
                text: value.format("%Y-%m-%d %H:%M:%S").to_string(),
            },
            None => Cell::Text(format_numeric(dt.as_f64())),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

fn header_name(cell: &Data, index: usize) -> String {
    match normalize(cell) {
        Cell::Empty => format!("Unnamed: {index}"),
        Cell::Number(v) => format_numeric(v),
        Cell::DateTime { text, .. } => text,
        Cell::Text(s) => s.trim().to_string(),
    }
}

/// Makes header names unique by suffixing repeats with `.1`, `.2`, ...
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    headers
        .into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = if *count == 0 {
                name
            } else {
                format!("{name}.{count}")
            };
            *count += 1;
            unique
        })
        .collect()
}

fn build_column(name: &str, cells: &[Cell]) -> PolarsResult<Column> {
    let numeric = cells
        .iter()
        .all(|cell| matches!(cell, Cell::Empty | Cell::Number(_)));
    let dates = cells
        .iter()
        .all(|cell| matches!(cell, Cell::Empty | Cell::DateTime { .. }))
        && cells.iter().any(|cell| matches!(cell, Cell::DateTime { .. }));
    if dates {
        let millis: Vec<Option<i64>> = cells
            .iter()
            .map(|cell| match cell {
                Cell::DateTime { millis, .. } => Some(*millis),
                _ => None,
            })
            .collect();
        let column = Series::new(name.into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
            .into_column();
        Ok(column)
    } else if numeric {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|cell| match cell {
                Cell::Number(v) => Some(*v),
                _ => None,
            })
            .collect();
        Ok(Series::new(name.into(), values).into_column())
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|cell| match cell {
                Cell::Empty => None,
                Cell::Number(v) => Some(format_numeric(*v)),
                Cell::DateTime { text, .. } => Some(text.clone()),
                Cell::Text(s) => Some(s.clone()),
            })
            .collect();
        Ok(Series::new(name.into(), values).into_column())
    }
}

/// Builds a frame from a worksheet range, using its first row as header.
pub fn range_to_frame(sheet: &str, range: &Range<Data>) -> Result<DataFrame, IngestError> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(IngestError::EmptySheet {
            sheet: sheet.to_string(),
        });
    };
    let headers = dedupe_headers(
        header_row
            .iter()
            .enumerate()
            .map(|(idx, cell)| header_name(cell, idx))
            .collect(),
    );
    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, column) in cells.iter_mut().enumerate() {
            column.push(row.get(idx).map_or(Cell::Empty, normalize));
        }
    }
    let columns = headers
        .iter()
        .zip(cells.iter())
        .map(|(name, values)| build_column(name, values))
        .collect::<PolarsResult<Vec<Column>>>()
        .map_err(|source| IngestError::frame(sheet, source))?;
    DataFrame::new(columns).map_err(|source| IngestError::frame(sheet, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_headers_get_suffixes() {
        let headers = dedupe_headers(vec!["V1".into(), "V1".into(), "V2".into(), "V1".into()]);
        assert_eq!(headers, vec!["V1", "V1.1", "V2", "V1.2"]);
    }

    #[test]
    fn blank_headers_are_named_by_position() {
        assert_eq!(header_name(&Data::Empty, 4), "Unnamed: 4");
        assert_eq!(header_name(&Data::Float(3.0), 0), "3");
        assert_eq!(header_name(&Data::String(" V2 ".into()), 1), "V2");
    }

    #[test]
    fn mixed_columns_fall_back_to_text() {
        let cells = vec![Cell::Number(1.0), Cell::Text("x".into()), Cell::Empty];
        let column = build_column("C", &cells).unwrap();
        assert_eq!(column.dtype(), &DataType::String);
        assert_eq!(column.null_count(), 1);
    }

    #[test]
    fn date_only_columns_keep_their_type() {
        let noon = Cell::DateTime {
            millis: 1_704_110_400_000,
            text: "2024-01-01 12:00:00".into(),
        };
        let column = build_column("Recorded", &[noon.clone(), Cell::Empty]).unwrap();
        assert_eq!(
            column.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(column.null_count(), 1);

        let mixed = build_column("Recorded", &[noon, Cell::Text("n/a".into())]).unwrap();
        assert_eq!(mixed.dtype(), &DataType::String);
        assert_eq!(
            mixed.get(0).unwrap().str_value().as_ref(),
            "2024-01-01 12:00:00"
        );
    }
}
