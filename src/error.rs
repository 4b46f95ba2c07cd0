//! Error types.
//! One enum per concern, `thiserror` only. Empty results and sentinel time
//! lags are not errors and never surface here.

/// Errors raised while loading or validating a [`MinerConfig`](crate::config::MinerConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Invalid value for {field}: {message}")]
    ValidationFailed { field: String, message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ParseError { .. } => "CONFIG_PARSE_ERROR",
            Self::ValidationFailed { .. } => "CONFIG_ERROR",
        }
    }
}

/// Errors raised while building a dataset or starting a mining run.
#[derive(Debug, thiserror::Error)]
pub enum GradualError {
    #[error("Dataset needs at least 2 records, got {rows}")]
    TooFewRecords { rows: usize },

    #[error("Record {row} has {found} values, expected {expected}")]
    RaggedRecord {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Column {column} has {found} values, expected {expected}")]
    ColumnLengthMismatch {
        column: usize,
        expected: usize,
        found: usize,
    },

    #[error("Column {column} out of range for {columns} columns")]
    ColumnOutOfRange { column: usize, columns: usize },

    #[error("Dataset has {titles} titles for {columns} columns")]
    TitleMismatch { titles: usize, columns: usize },

    #[error("Temporal mining requires a time column")]
    MissingTimeColumn,

    #[error("Reference column {0} is a time column")]
    ReferenceIsTimeColumn(usize),

    #[error("Invalid gradual item: {0:?}")]
    InvalidItem(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl GradualError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TooFewRecords { .. } => "TOO_FEW_RECORDS",
            Self::RaggedRecord { .. } => "RAGGED_RECORD",
            Self::ColumnLengthMismatch { .. } => "COLUMN_LENGTH_MISMATCH",
            Self::ColumnOutOfRange { .. } => "COLUMN_OUT_OF_RANGE",
            Self::TitleMismatch { .. } => "TITLE_MISMATCH",
            Self::MissingTimeColumn => "MISSING_TIME_COLUMN",
            Self::ReferenceIsTimeColumn(_) => "REFERENCE_IS_TIME_COLUMN",
            Self::InvalidItem(_) => "INVALID_ITEM",
            Self::Config(e) => e.error_code(),
        }
    }
}

pub type GradualResult<T> = Result<T, GradualError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_code_passes_through() {
        let err: GradualError = ConfigError::ValidationFailed {
            field: "min_support".to_string(),
            message: "must be finite".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("min_support"));
    }

    #[test]
    fn test_too_few_records_message() {
        let err = GradualError::TooFewRecords { rows: 1 };
        assert_eq!(err.error_code(), "TOO_FEW_RECORDS");
        assert_eq!(err.to_string(), "Dataset needs at least 2 records, got 1");
    }
}
