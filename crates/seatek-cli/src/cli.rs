//! CLI argument definitions for the outlier analysis.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use seatek_detect::DetectError;
use seatek_model::{DEFAULT_DIFFERENCES_SHEET, DetectionMethod};

#[derive(Parser)]
#[command(
    name = "seatek-outliers",
    version,
    about = "Detect and correct year-to-year outliers in Seatek sensor workbooks",
    long_about = "Detect anomalous year-to-year sensor differences and correct them.\n\n\
                  Reads the differences sheet of an analysis workbook, flags outliers \
                  with the abs, zscore or iqr method, and writes a corrected copy of \
                  the matching 'Raw Data <year>' sheet for each flagged difference, \
                  plus a corrections summary and a scatter plot."
)]
pub struct Cli {
    /// Path to the Seatek comprehensive analysis workbook.
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input: PathBuf,

    /// Sheet containing the year-to-year differences.
    #[arg(
        short = 's',
        long = "sheet-summary",
        alias = "sheet_summary",
        value_name = "NAME",
        default_value = DEFAULT_DIFFERENCES_SHEET
    )]
    pub sheet_summary: String,

    /// Outlier detection method: abs (|diff| >= threshold), zscore, or iqr.
    #[arg(short = 'm', long = "method", default_value = "abs", value_parser = parse_method)]
    pub method: DetectionMethod,

    /// Threshold for the abs method (cm).
    #[arg(short = 't', long = "threshold", default_value_t = 0.1)]
    pub threshold: f64,

    /// Z-score threshold for the zscore method.
    #[arg(short = 'z', long = "zscore", default_value_t = 3.0)]
    pub zscore: f64,

    /// IQR factor for the iqr method.
    #[arg(
        short = 'f',
        long = "iqr-factor",
        alias = "iqr_factor",
        default_value_t = 1.5
    )]
    pub iqr_factor: f64,

    /// Directory for corrected workbooks, the summary and the plot (created if absent).
    #[arg(short = 'o', long = "output", value_name = "DIR", default_value = "output")]
    pub output: PathBuf,

    /// File format of the corrections summary.
    #[arg(long = "summary-format", value_enum, default_value = "xlsx")]
    pub summary_format: SummaryFormatArg,

    /// Skip rendering the outlier scatter plot.
    #[arg(long = "no-plot")]
    pub no_plot: bool,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

fn parse_method(value: &str) -> Result<DetectionMethod, DetectError> {
    value.parse().map_err(DetectError::from)
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SummaryFormatArg {
    Xlsx,
    Csv,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
