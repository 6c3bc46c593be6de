use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseMethodError;

/// Statistical test used to isolate anomalous year-to-year differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    /// Flag differences whose magnitude reaches a fixed threshold.
    Abs,
    /// Flag differences far from the mean, in units of standard deviation.
    Zscore,
    /// Flag differences outside the Tukey fences built on the quartiles.
    Iqr,
}

impl DetectionMethod {
    pub const ALL: [DetectionMethod; 3] = [Self::Abs, Self::Zscore, Self::Iqr];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Zscore => "zscore",
            Self::Iqr => "iqr",
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionMethod {
    type Err = ParseMethodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abs" => Ok(Self::Abs),
            "zscore" => Ok(Self::Zscore),
            "iqr" => Ok(Self::Iqr),
            _ => Err(ParseMethodError {
                method: value.to_string(),
            }),
        }
    }
}

/// Per-method parameters. Only the one matching the selected method is read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum `|difference|` flagged by [`DetectionMethod::Abs`].
    pub abs_threshold: f64,
    /// Number of standard deviations used by [`DetectionMethod::Zscore`].
    pub zscore_threshold: f64,
    /// Fence multiplier used by [`DetectionMethod::Iqr`].
    pub iqr_factor: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            abs_threshold: 0.1,
            zscore_threshold: 3.0,
            iqr_factor: 1.5,
        }
    }
}

impl Thresholds {
    #[must_use]
    pub fn with_abs_threshold(mut self, value: f64) -> Self {
        self.abs_threshold = value;
        self
    }

    #[must_use]
    pub fn with_zscore_threshold(mut self, value: f64) -> Self {
        self.zscore_threshold = value;
        self
    }

    #[must_use]
    pub fn with_iqr_factor(mut self, value: f64) -> Self {
        self.iqr_factor = value;
        self
    }
}
