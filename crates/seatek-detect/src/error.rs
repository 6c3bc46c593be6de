use seatek_model::ParseMethodError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectError {
    #[error("invalid detection method '{method}' (expected abs, zscore or iqr)")]
    InvalidMethod { method: String },
}

impl From<ParseMethodError> for DetectError {
    fn from(error: ParseMethodError) -> Self {
        Self::InvalidMethod {
            method: error.method,
        }
    }
}
