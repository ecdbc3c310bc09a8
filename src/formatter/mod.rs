//! Dataset formatting for the forecasting pipeline
//!
//! A formatter owns the column schema of one dataset, calibrates
//! normalization and encoding statistics on the training partition,
//! applies them consistently across every split, and reverses target
//! scaling on model output for reporting.

pub mod volatility;

pub use volatility::{VolatilityFormatter, PARTITION_COLUMN, PREDICTION_RESERVED_COLUMNS};

use crate::config::{FixedParams, ModelParams};
use crate::error::Result;
use crate::schema::Schema;
use crate::table::DataTable;

/// Capability interface implemented by each dataset formatter.
///
/// One concrete type exists per dataset variant; callers program
/// against this trait. Calibration must run before any transform:
/// `split_data` does both in order, `set_scalers` alone prepares a
/// formatter for tables split elsewhere.
pub trait DataFormatter {
    /// Column schema for this dataset
    fn schema(&self) -> &Schema;

    /// Partitions rows on the time-bucket column into train
    /// (`day < valid_boundary`), validation
    /// (`valid_boundary <= day < test_boundary`) and test
    /// (`day >= test_boundary`), calibrates scalers on the training
    /// partition only, and returns the three transformed tables in
    /// that order.
    fn split_data(
        &mut self,
        table: &DataTable,
        valid_boundary: f64,
        test_boundary: f64,
    ) -> Result<(DataTable, DataTable, DataTable)>;

    /// Calibrates scalers and encoders from a training table,
    /// replacing any previous calibration
    fn set_scalers(&mut self, table: &DataTable) -> Result<()>;

    /// Returns a transformed copy of `table` using the calibrated
    /// statistics; the input is not mutated
    fn transform_inputs(&self, table: &DataTable) -> Result<DataTable>;

    /// Reverses target scaling on a table of model predictions
    fn format_predictions(&self, predictions: &DataTable) -> Result<DataTable>;

    /// Fixed experiment parameters for a forecast horizon
    fn fixed_params(&self, forecast_horizon: usize) -> FixedParams;

    /// Default optimised model hyperparameters
    fn default_model_params(&self) -> ModelParams;
}
