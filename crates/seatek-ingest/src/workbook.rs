//! Read access to the sheets of an analysis workbook.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Reader, Sheets, open_workbook_auto};
use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::IngestError;
use crate::sheet::range_to_frame;

/// A source of named sheets, each loaded as a frame.
pub trait WorkbookSource {
    /// Loads one sheet. Fails with [`IngestError::MissingSheet`] when absent.
    fn read_sheet(&self, sheet: &str) -> Result<DataFrame, IngestError>;

    /// Names of all sheets, in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    fn has_sheet(&self, sheet: &str) -> bool {
        self.sheet_names().iter().any(|name| name == sheet)
    }
}

/// An `.xlsx`/`.xls`/`.ods` workbook on disk, opened once and read lazily.
pub struct XlsxWorkbook {
    path: PathBuf,
    sheets: RefCell<Sheets<BufReader<File>>>,
}

impl XlsxWorkbook {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref().to_path_buf();
        let sheets = open_workbook_auto(&path).map_err(|source| IngestError::Open {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "opened workbook");
        Ok(Self {
            path,
            sheets: RefCell::new(sheets),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without directory and extension, used to name corrected copies.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workbook".to_string())
    }
}

impl WorkbookSource for XlsxWorkbook {
    fn read_sheet(&self, sheet: &str) -> Result<DataFrame, IngestError> {
        if !self.has_sheet(sheet) {
            return Err(IngestError::MissingSheet {
                sheet: sheet.to_string(),
            });
        }
        let range = self
            .sheets
            .borrow_mut()
            .worksheet_range(sheet)
            .map_err(|source| IngestError::Sheet {
                sheet: sheet.to_string(),
                source,
            })?;
        let frame = range_to_frame(sheet, &range)?;
        debug!(
            sheet,
            rows = frame.height(),
            columns = frame.width(),
            "loaded sheet"
        );
        Ok(frame)
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.borrow().sheet_names()
    }
}

/// Sheets held in memory; useful when frames are produced programmatically.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkbook {
    sheets: BTreeMap<String, DataFrame>,
}

impl InMemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sheet(mut self, name: impl Into<String>, frame: DataFrame) -> Self {
        self.insert(name, frame);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, frame: DataFrame) {
        self.sheets.insert(name.into(), frame);
    }
}

impl WorkbookSource for InMemoryWorkbook {
    fn read_sheet(&self, sheet: &str) -> Result<DataFrame, IngestError> {
        self.sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| IngestError::MissingSheet {
                sheet: sheet.to_string(),
            })
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.keys().cloned().collect()
    }
}
