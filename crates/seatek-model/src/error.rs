use thiserror::Error;

/// Returned when a detection method name is not one of `abs`, `zscore`, `iqr`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown outlier detection method: {method} (expected abs, zscore or iqr)")]
pub struct ParseMethodError {
    pub method: String,
}
