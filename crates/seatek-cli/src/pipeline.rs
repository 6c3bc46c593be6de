//! Batch pipeline with explicit stages.
//!
//! 1. **Ingest**: open the workbook, melt the differences sheet into records
//! 2. **Detect**: flag outliers with the configured method
//! 3. **Correct**: shift the matching raw-data sheet for every outlier
//! 4. **Report**: write the corrections summary and the outlier plot
//!
//! Only configuration-level failures abort a run. A single outlier that
//! cannot be corrected is logged and skipped.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use seatek_correct::CorrectionEngine;
use seatek_detect::detect;
use seatek_ingest::{WorkbookSource, XlsxWorkbook, load_differences};
use seatek_model::{
    CorrectionRecord, DEFAULT_DIFFERENCES_SHEET, DetectionMethod, DifferenceRecord, PLOT_FILE_NAME,
    Thresholds,
};
use seatek_output::{SummaryFormat, write_corrections_summary};
use seatek_report::{PlotOptions, plot_outliers};
use tracing::{info, info_span, warn};

/// Everything a run needs; built from CLI flags or directly by callers.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub differences_sheet: String,
    pub method: DetectionMethod,
    pub thresholds: Thresholds,
    pub output_dir: PathBuf,
    pub summary_format: SummaryFormat,
    pub plot: bool,
}

impl RunConfig {
    /// Configuration with the CLI defaults for `input`.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            differences_sheet: DEFAULT_DIFFERENCES_SHEET.to_string(),
            method: DetectionMethod::Abs,
            thresholds: Thresholds::default(),
            output_dir: PathBuf::from("output"),
            summary_format: SummaryFormat::default(),
            plot: true,
        }
    }
}

/// An outlier that produced no correction, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedOutlier {
    pub record: DifferenceRecord,
    pub reason: String,
}

/// Result of a completed run.
#[derive(Debug)]
pub struct RunOutcome {
    pub input: PathBuf,
    pub method: DetectionMethod,
    pub outliers: Vec<DifferenceRecord>,
    /// Applied corrections, in outlier order.
    pub corrections: Vec<CorrectionRecord>,
    pub skipped: Vec<SkippedOutlier>,
    pub summary_path: PathBuf,
    pub plot_path: Option<PathBuf>,
}

pub fn run(config: &RunConfig) -> Result<RunOutcome> {
    let span = info_span!("run", input = %config.input.display(), method = %config.method);
    let _guard = span.enter();
    let started = Instant::now();

    validate_config(config)?;

    // =========================================================================
    // Stage 1: Ingest
    // =========================================================================
    let workbook = XlsxWorkbook::open(&config.input)
        .with_context(|| format!("open input workbook {}", config.input.display()))?;
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("create output directory {}", config.output_dir.display())
    })?;
    info!(path = %workbook.path().display(), "loading year-to-year differences");
    let records = load_differences(&workbook, &config.differences_sheet)
        .with_context(|| format!("load differences sheet '{}'", config.differences_sheet))?;

    // =========================================================================
    // Stage 2: Detect
    // =========================================================================
    let outliers = detect(&records, config.method, &config.thresholds);
    info!(
        outliers = outliers.len(),
        records = records.len(),
        "detected {} outliers using '{}' method",
        outliers.len(),
        config.method
    );
    drop(records);

    // =========================================================================
    // Stage 3: Correct
    // =========================================================================
    let mut engine = CorrectionEngine::new(&config.output_dir, workbook.stem());
    let (corrections, skipped) = correct_outliers(&mut engine, &outliers, &workbook);

    // =========================================================================
    // Stage 4: Report
    // =========================================================================
    let summary_path =
        write_corrections_summary(&config.output_dir, &corrections, config.summary_format)
            .context("write corrections summary")?;
    let plot_path = if config.plot {
        write_plot(config, &outliers)
    } else {
        None
    };

    info!(
        corrections = corrections.len(),
        skipped = skipped.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "run finished"
    );
    Ok(RunOutcome {
        input: config.input.clone(),
        method: config.method,
        outliers,
        corrections,
        skipped,
        summary_path,
        plot_path,
    })
}

fn validate_config(config: &RunConfig) -> Result<()> {
    if !config.input.is_file() {
        bail!("input workbook not found: {}", config.input.display());
    }
    let thresholds = &config.thresholds;
    let active = match config.method {
        DetectionMethod::Abs => ("threshold", thresholds.abs_threshold),
        DetectionMethod::Zscore => ("zscore", thresholds.zscore_threshold),
        DetectionMethod::Iqr => ("iqr_factor", thresholds.iqr_factor),
    };
    if !active.1.is_finite() {
        bail!("{} must be a finite number, got {}", active.0, active.1);
    }
    if active.1 < 0.0 {
        warn!(parameter = active.0, value = active.1, "negative threshold");
    }
    Ok(())
}

/// Runs the correction engine over every outlier, in order.
pub fn correct_outliers(
    engine: &mut CorrectionEngine,
    outliers: &[DifferenceRecord],
    workbook: &impl WorkbookSource,
) -> (Vec<CorrectionRecord>, Vec<SkippedOutlier>) {
    let mut corrections = Vec::new();
    let mut skipped = Vec::new();
    for outlier in outliers {
        let span = info_span!(
            "correction",
            year_pair = %outlier.year_pair,
            sensor = outlier.sensor_id
        );
        let _guard = span.enter();
        match engine.correct(outlier, workbook) {
            Ok(correction) => corrections.push(correction),
            Err(error) => {
                warn!(
                    year_pair = %outlier.year_pair,
                    sensor = outlier.sensor_id,
                    difference = outlier.difference,
                    "skipping outlier: {error}"
                );
                skipped.push(SkippedOutlier {
                    record: outlier.clone(),
                    reason: error.to_string(),
                });
            }
        }
    }
    (corrections, skipped)
}

fn write_plot(config: &RunConfig, outliers: &[DifferenceRecord]) -> Option<PathBuf> {
    let path = plot_path(&config.output_dir);
    let options = PlotOptions::for_method(config.method, &config.thresholds);
    match plot_outliers(&path, outliers, &options) {
        Ok(()) => Some(path),
        Err(error) => {
            warn!("{error}");
            None
        }
    }
}

pub fn plot_path(output_dir: &Path) -> PathBuf {
    output_dir.join(PLOT_FILE_NAME)
}
