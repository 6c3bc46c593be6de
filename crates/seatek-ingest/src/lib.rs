pub mod error;
pub mod polars_utils;
pub mod reshape;
pub mod sheet;
pub mod workbook;

pub use error::IngestError;
pub use polars_utils::{any_to_f64, any_to_string, format_numeric, parse_f64};
pub use reshape::{load_differences, melt_differences};
pub use sheet::range_to_frame;
pub use workbook::{InMemoryWorkbook, WorkbookSource, XlsxWorkbook};
