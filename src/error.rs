//! Error types for the volatility formatter library

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, FormatterError>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum FormatterError {
    /// Schema or input table inconsistency
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Transform requested before calibration
    #[error("Scalers have not been set")]
    ScalersNotSet,

    /// Categorical value absent from the calibrated label mapping
    #[error("Unseen label '{label}' in column '{column}'")]
    UnseenLabel { column: String, label: String },

    /// Matrix width differs from the fitted column count
    #[error("Shape mismatch: expected {expected} columns, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
}
