//! Outlier selection over long-form difference records.
//!
//! Statistics are computed over the finite differences only. A `NaN`
//! difference never compares as an outlier under any method.

use seatek_model::{DetectionMethod, DifferenceRecord, Thresholds};
use tracing::debug;

use crate::error::DetectError;
use crate::stats::{Summary, quantile, sorted_finite};

/// Returns the records flagged by `method`, in input order.
pub fn detect(
    records: &[DifferenceRecord],
    method: DetectionMethod,
    thresholds: &Thresholds,
) -> Vec<DifferenceRecord> {
    let values: Vec<f64> = records.iter().map(|record| record.difference).collect();
    let flags = match method {
        DetectionMethod::Abs => abs_flags(&values, thresholds.abs_threshold),
        DetectionMethod::Zscore => zscore_flags(&values, thresholds.zscore_threshold),
        DetectionMethod::Iqr => iqr_flags(&values, thresholds.iqr_factor),
    };
    let outliers: Vec<DifferenceRecord> = records
        .iter()
        .zip(flags)
        .filter_map(|(record, flagged)| flagged.then(|| record.clone()))
        .collect();
    debug!(
        method = %method,
        records = records.len(),
        outliers = outliers.len(),
        "outlier detection finished"
    );
    outliers
}

/// Like [`detect`], with the method given by name (`abs`, `zscore`, `iqr`).
pub fn detect_named(
    records: &[DifferenceRecord],
    method: &str,
    thresholds: &Thresholds,
) -> Result<Vec<DifferenceRecord>, DetectError> {
    let method: DetectionMethod = method.parse()?;
    Ok(detect(records, method, thresholds))
}

fn abs_flags(values: &[f64], threshold: f64) -> Vec<bool> {
    values.iter().map(|v| v.abs() >= threshold).collect()
}

/// A value equal to the mean is never flagged, which also makes a zero-variance
/// sample outlier-free.
fn zscore_flags(values: &[f64], threshold: f64) -> Vec<bool> {
    let Some(summary) = Summary::of(values) else {
        return vec![false; values.len()];
    };
    let limit = threshold * summary.std_dev;
    values
        .iter()
        .map(|v| {
            let deviation = (v - summary.mean).abs();
            deviation > 0.0 && deviation >= limit
        })
        .collect()
}

fn iqr_flags(values: &[f64], factor: f64) -> Vec<bool> {
    let sorted = sorted_finite(values);
    let (Some(q1), Some(q3)) = (quantile(&sorted, 0.25), quantile(&sorted, 0.75)) else {
        return vec![false; values.len()];
    };
    let iqr = q3 - q1;
    let lower = q1 - factor * iqr;
    let upper = q3 + factor * iqr;
    values.iter().map(|v| *v < lower || *v > upper).collect()
}
