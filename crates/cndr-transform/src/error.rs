//! Error types for the transformation stages.

use polars::prelude::{DataType, PolarsError};
use thiserror::Error;

/// Errors raised by the pipeline.
///
/// Absent optional inputs are not errors; the affected derivation is skipped.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A column the stage cannot run without is absent.
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    /// A column's values cannot be interpreted.
    #[error("malformed input in column '{column}': {detail}")]
    MalformedInput { column: String, detail: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl TransformError {
    pub(crate) fn missing_column(column: &str) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
        }
    }

    pub(crate) fn malformed_cell(column: &str, row: usize, value: &str, reason: &str) -> Self {
        Self::MalformedInput {
            column: column.to_string(),
            detail: format!("{reason} at row {row} (value '{value}')"),
        }
    }

    pub(crate) fn malformed_dtype(column: &str, dtype: &DataType) -> Self {
        Self::MalformedInput {
            column: column.to_string(),
            detail: format!("unsupported column type {dtype}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            TransformError::missing_column("NPDx3").to_string(),
            "missing required column 'NPDx3'"
        );
        assert_eq!(
            TransformError::malformed_cell("Braak06", 2, "IV", "not a number").to_string(),
            "malformed input in column 'Braak06': not a number at row 2 (value 'IV')"
        );
    }
}
