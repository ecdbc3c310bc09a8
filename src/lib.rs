//! # Volatility TFT
//!
//! Dataset formatting and scaler calibration for Temporal Fusion
//! Transformer volatility forecasting on limit order book data.
//!
//! The crate declares the column schema of the volatility dataset,
//! partitions raw tables into train/validation/test splits, calibrates
//! normalization and encoding statistics on the training partition
//! only, applies them consistently to every split, and reverses target
//! scaling on model predictions for reporting. Loading raw tables from
//! storage and training the forecasting model are external
//! collaborators.
//!
//! ## Modules
//!
//! - `schema` - Column declarations (data type and input role)
//! - `table` - In-memory tables with named columns
//! - `preprocessing` - Standard scaler and label encoder
//! - `formatter` - The `DataFormatter` trait and the volatility dataset
//!   formatter
//! - `config` - Fixed experiment and model hyperparameters
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use volatility_tft::{DataFormatter, VolatilityFormatter};
//!
//! // Raw table from the data-loading layer, with a DAY partition column
//! let table = load_order_book_table()?;
//!
//! let mut formatter = VolatilityFormatter::new();
//! let (train, valid, test) = formatter.split_data(&table, 7.0, 8.0)?;
//!
//! // ... train the model on the transformed splits ...
//!
//! let reported = formatter.format_predictions(&predictions)?;
//! ```

pub mod config;
pub mod error;
pub mod formatter;
pub mod preprocessing;
pub mod schema;
pub mod table;

// Re-exports for convenience
pub use config::{FixedParams, ModelParams, DEFAULT_FORECAST_HORIZON, NUM_ENCODER_STEPS};
pub use error::{FormatterError, Result};
pub use formatter::{
    DataFormatter, VolatilityFormatter, PARTITION_COLUMN, PREDICTION_RESERVED_COLUMNS,
};
pub use preprocessing::{LabelEncoder, StandardScaler};
pub use schema::{ColumnSpec, DataType, InputType, Schema};
pub use table::{Column, DataTable};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
