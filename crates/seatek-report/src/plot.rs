//! Scatter plot of flagged differences, one point per outlier in detection order.

use std::error::Error;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use plotters::style::FontTransform;
use seatek_model::{DetectionMethod, DifferenceRecord, Thresholds};
use tracing::info;

const ZERO_LINE: RGBColor = RGBColor(128, 128, 128);

#[derive(Debug, thiserror::Error)]
#[error("failed to draw plot {path}: {message}")]
pub struct PlotError {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub y_label: String,
    /// Draws dashed lines at `+threshold` and `-threshold` when set.
    pub threshold: Option<f64>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            title: "Outlier Differences".to_string(),
            y_label: "Difference (cm)".to_string(),
            threshold: None,
        }
    }
}

impl PlotOptions {
    /// Default options; threshold lines only for the absolute method.
    pub fn for_method(method: DetectionMethod, thresholds: &Thresholds) -> Self {
        Self {
            threshold: (method == DetectionMethod::Abs).then_some(thresholds.abs_threshold),
            ..Self::default()
        }
    }
}

/// Y-axis range covering the points, the zero line and the threshold lines,
/// padded by a tenth of the span.
pub fn value_range(values: &[f64], threshold: Option<f64>) -> (f64, f64) {
    let mut low = 0.0f64;
    let mut high = 0.0f64;
    let extra = threshold.map(|t| [t, -t]).unwrap_or([0.0, 0.0]);
    for value in values.iter().chain(extra.iter()).filter(|v| v.is_finite()) {
        low = low.min(*value);
        high = high.max(*value);
    }
    let span = high - low;
    if span == 0.0 {
        return (low - 1.0, high + 1.0);
    }
    (low - span * 0.1, high + span * 0.1)
}

pub fn plot_outliers(
    path: &Path,
    outliers: &[DifferenceRecord],
    options: &PlotOptions,
) -> Result<(), PlotError> {
    draw(path, outliers, options).map_err(|error| PlotError {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    info!(path = %path.display(), points = outliers.len(), "saved plot");
    Ok(())
}

fn draw(
    path: &Path,
    outliers: &[DifferenceRecord],
    options: &PlotOptions,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<String> = outliers.iter().map(DifferenceRecord::plot_label).collect();
    let values: Vec<f64> = outliers.iter().map(|record| record.difference).collect();
    let segments = outliers.len().max(1);
    let (y_min, y_max) = value_range(&values, options.threshold);

    let mut chart = ChartBuilder::on(&root)
        .caption(&options.title, ("sans-serif", 25).into_font())
        .margin(10)
        .x_label_area_size(160)
        .y_label_area_size(80)
        .build_cartesian_2d((0..segments).into_segmented(), y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(segments)
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(idx) | SegmentValue::Exact(idx) => {
                labels.get(*idx).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .x_label_style(
            ("sans-serif", 12)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .y_desc(options.y_label.as_str())
        .y_label_formatter(&|v| format!("{v:.2}"))
        .draw()?;

    let across = |y: f64| [(SegmentValue::Exact(0), y), (SegmentValue::Last, y)];
    chart.draw_series(LineSeries::new(across(0.0), ZERO_LINE.stroke_width(1)))?;
    if let Some(threshold) = options.threshold {
        for level in [threshold, -threshold] {
            chart.draw_series(DashedLineSeries::new(
                across(level),
                10,
                5,
                RED.stroke_width(2),
            ))?;
        }
    }

    chart.draw_series(PointSeries::of_element(
        values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(idx, v)| (SegmentValue::CenterOf(idx), *v)),
        5,
        BLUE,
        &|c, s, st| Circle::new(c, s, st.filled()),
    ))?;

    root.present()?;
    Ok(())
}
