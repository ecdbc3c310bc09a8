//! Formatter for the limit order book volatility dataset

use std::collections::{BTreeMap, HashSet};

use ndarray::Array2;
use tracing::info;

use crate::config::{FixedParams, ModelParams};
use crate::error::{FormatterError, Result};
use crate::formatter::DataFormatter;
use crate::preprocessing::{LabelEncoder, StandardScaler};
use crate::schema::{ColumnSpec, DataType, InputType, Schema};
use crate::table::{Column, DataTable};

/// Time-bucket column used to partition rows into train/valid/test.
///
/// This is a partitioning key supplied by the caller, not the schema's
/// `Time` column.
pub const PARTITION_COLUMN: &str = "DAY";

/// Prediction columns passed through `format_predictions` unchanged
pub const PREDICTION_RESERVED_COLUMNS: [&str; 2] = ["forecast_time", "identifier"];

/// Calibrated normalization and encoding state
#[derive(Debug, Clone)]
struct ScalerState {
    /// Joint per-column scaler over the real-valued columns
    real_scaler: StandardScaler,
    /// Column set the real scaler was fitted on, schema order
    real_columns: Vec<String>,
    /// Separate single-column scaler over the target, used to rescale
    /// predictions
    target_scaler: StandardScaler,
    /// Label encoder per categorical column
    encoders: BTreeMap<String, LabelEncoder>,
    /// Distinct label count per categorical column, schema order
    num_classes: Vec<usize>,
    /// Distinct identifier values seen at calibration, first-seen order
    identifiers: Vec<String>,
}

/// Formatter for the volatility dataset.
///
/// Owns the column schema and the scaler state calibrated from the
/// training partition. Calibration runs exactly once per split in
/// normal use; transforms before calibration fail with
/// [`FormatterError::ScalersNotSet`]. The struct has no internal
/// locking, so concurrent calibration and transform on one instance
/// must be serialized by the caller.
#[derive(Debug, Clone)]
pub struct VolatilityFormatter {
    schema: Schema,
    scalers: Option<ScalerState>,
    time_steps: usize,
    num_encoder_steps: usize,
}

impl VolatilityFormatter {
    /// Creates a formatter with the volatility column schema
    pub fn new() -> Self {
        let schema = Schema::new(vec![
            ColumnSpec::new("PRICE_ASK_0", DataType::RealValued, InputType::KnownInput),
            ColumnSpec::new("PRICE_BID_0", DataType::RealValued, InputType::KnownInput),
            ColumnSpec::new("VOLUME_ASK_0", DataType::RealValued, InputType::KnownInput),
            ColumnSpec::new("VOLUME_BID_0", DataType::RealValued, InputType::KnownInput),
            ColumnSpec::new("SPREAD", DataType::RealValued, InputType::KnownInput),
            ColumnSpec::new("midprice", DataType::RealValued, InputType::KnownInput),
            ColumnSpec::new("id", DataType::RealValued, InputType::Id),
            ColumnSpec::new("time", DataType::RealValued, InputType::Time),
            ColumnSpec::new("rolling_volatility", DataType::RealValued, InputType::Target),
            ColumnSpec::new("STOCK", DataType::Categorical, InputType::StaticInput),
        ])
        .expect("volatility schema is well-formed");

        let fixed = FixedParams::default();
        Self {
            schema,
            scalers: None,
            time_steps: fixed.total_time_steps,
            num_encoder_steps: fixed.num_encoder_steps,
        }
    }

    /// Total sequence length used by the experiment
    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    /// Lookback window length fed to the encoder
    pub fn num_encoder_steps(&self) -> usize {
        self.num_encoder_steps
    }

    /// Distinct identifiers observed during calibration
    pub fn identifiers(&self) -> Option<&[String]> {
        self.scalers.as_ref().map(|s| s.identifiers.as_slice())
    }

    /// Cardinality of each categorical input, schema order.
    ///
    /// Sizes the downstream embedding tables.
    pub fn num_classes_per_cat_input(&self) -> Option<&[usize]> {
        self.scalers.as_ref().map(|s| s.num_classes.as_slice())
    }

    fn state(&self) -> Result<&ScalerState> {
        self.scalers.as_ref().ok_or(FormatterError::ScalersNotSet)
    }

    /// Real-valued columns the joint scaler is calibrated over.
    ///
    /// Excludes the id and time roles; includes the target.
    fn real_input_columns(&self) -> Vec<&str> {
        self.schema
            .columns_of_type(DataType::RealValued, &[InputType::Id, InputType::Time])
    }

    /// Categorical columns that get label-encoded
    fn categorical_input_columns(&self) -> Vec<&str> {
        self.schema
            .columns_of_type(DataType::Categorical, &[InputType::Id, InputType::Time])
    }

    /// Gathers the named numeric columns into a (rows x columns) matrix
    fn numeric_matrix(table: &DataTable, columns: &[&str]) -> Result<Array2<f64>> {
        let mut matrix = Array2::zeros((table.num_rows(), columns.len()));
        for (j, name) in columns.iter().enumerate() {
            let values = table.numeric_column(name)?;
            for (i, &value) in values.iter().enumerate() {
                matrix[[i, j]] = value;
            }
        }
        Ok(matrix)
    }
}

impl Default for VolatilityFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFormatter for VolatilityFormatter {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn split_data(
        &mut self,
        table: &DataTable,
        valid_boundary: f64,
        test_boundary: f64,
    ) -> Result<(DataTable, DataTable, DataTable)> {
        info!(valid_boundary, test_boundary, "formatting train-valid-test splits");

        if table.column(PARTITION_COLUMN).is_none() {
            return Err(FormatterError::ConfigError(format!(
                "partition column '{}' is missing",
                PARTITION_COLUMN
            )));
        }

        let train = table.filter_rows(PARTITION_COLUMN, |day| day < valid_boundary)?;
        let valid = table.filter_rows(PARTITION_COLUMN, |day| {
            day >= valid_boundary && day < test_boundary
        })?;
        let test = table.filter_rows(PARTITION_COLUMN, |day| day >= test_boundary)?;

        // Calibration sees the training partition only
        self.set_scalers(&train)?;

        Ok((
            self.transform_inputs(&train)?,
            self.transform_inputs(&valid)?,
            self.transform_inputs(&test)?,
        ))
    }

    fn set_scalers(&mut self, table: &DataTable) -> Result<()> {
        info!(rows = table.num_rows(), "calibrating scalers on training data");

        if table.num_rows() == 0 {
            return Err(FormatterError::ConfigError(
                "cannot calibrate scalers on an empty table".to_string(),
            ));
        }

        let id_column = self.schema.single_column(InputType::Id)?;
        let target_column = self.schema.single_column(InputType::Target)?;

        // Identifiers retained for entity-indexed batching downstream
        let mut seen = HashSet::new();
        let mut identifiers = Vec::new();
        let id_labels = table
            .column(id_column)
            .ok_or_else(|| {
                FormatterError::ConfigError(format!("missing column '{}'", id_column))
            })?
            .to_labels();
        for label in id_labels {
            if seen.insert(label.clone()) {
                identifiers.push(label);
            }
        }

        let real_columns: Vec<String> = self
            .real_input_columns()
            .into_iter()
            .map(str::to_string)
            .collect();
        let real_refs: Vec<&str> = real_columns.iter().map(String::as_str).collect();
        let real_scaler = StandardScaler::fit(&Self::numeric_matrix(table, &real_refs)?)?;

        let target_scaler =
            StandardScaler::fit(&Self::numeric_matrix(table, &[target_column])?)?;

        let mut encoders = BTreeMap::new();
        let mut num_classes = Vec::new();
        for name in self.categorical_input_columns() {
            let labels = table
                .column(name)
                .ok_or_else(|| {
                    FormatterError::ConfigError(format!("missing column '{}'", name))
                })?
                .to_labels();
            let encoder = LabelEncoder::fit(&labels)?;
            num_classes.push(encoder.num_classes());
            encoders.insert(name.to_string(), encoder);
        }

        self.scalers = Some(ScalerState {
            real_scaler,
            real_columns,
            target_scaler,
            encoders,
            num_classes,
            identifiers,
        });
        Ok(())
    }

    fn transform_inputs(&self, table: &DataTable) -> Result<DataTable> {
        let state = self.state()?;
        let target_column = self.schema.single_column(InputType::Target)?;

        let mut output = table.clone();

        // Real feature columns take the per-column training statistics.
        // The target passes through unscaled here; predictions are
        // rescaled later through the separate target scaler.
        for (index, name) in state.real_columns.iter().enumerate() {
            if name == target_column {
                continue;
            }
            let scaled = state
                .real_scaler
                .transform_column(index, table.numeric_column(name)?)?;
            output.replace_column(name, Column::Numeric(scaled))?;
        }

        // Categorical columns become dense integer codes
        for (name, encoder) in &state.encoders {
            let labels = table
                .column(name)
                .ok_or_else(|| {
                    FormatterError::ConfigError(format!("missing column '{}'", name))
                })?
                .to_labels();
            let codes = encoder.transform(&labels, name)?;
            output.replace_column(
                name,
                Column::Numeric(codes.into_iter().map(|code| code as f64).collect()),
            )?;
        }

        Ok(output)
    }

    fn format_predictions(&self, predictions: &DataTable) -> Result<DataTable> {
        let state = self.state()?;

        let mut output = predictions.clone();
        for name in predictions.names().to_vec() {
            if PREDICTION_RESERVED_COLUMNS.contains(&name.as_str()) {
                continue;
            }
            let restored = state
                .target_scaler
                .inverse_transform_column(0, predictions.numeric_column(&name)?)?;
            output.replace_column(&name, Column::Numeric(restored))?;
        }
        Ok(output)
    }

    fn fixed_params(&self, forecast_horizon: usize) -> FixedParams {
        FixedParams::for_horizon(forecast_horizon)
    }

    fn default_model_params(&self) -> ModelParams {
        ModelParams::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(values: &[&str]) -> Column {
        Column::Text(values.iter().map(|s| s.to_string()).collect())
    }

    /// Four-row training table with two stocks
    fn sample_table() -> DataTable {
        let mut table = DataTable::new();
        for name in [
            "PRICE_ASK_0",
            "PRICE_BID_0",
            "VOLUME_ASK_0",
            "VOLUME_BID_0",
            "SPREAD",
            "midprice",
        ] {
            table
                .push_column(name, Column::Numeric(vec![1.0, 2.0, 3.0, 4.0]))
                .unwrap();
        }
        table
            .push_column("id", Column::Numeric(vec![0.0, 0.0, 1.0, 1.0]))
            .unwrap();
        table
            .push_column("time", Column::Numeric(vec![10.0, 11.0, 10.0, 11.0]))
            .unwrap();
        table
            .push_column(
                "rolling_volatility",
                Column::Numeric(vec![0.1, 0.2, 0.3, 0.4]),
            )
            .unwrap();
        table
            .push_column("STOCK", text(&["AAPL", "AAPL", "MSFT", "MSFT"]))
            .unwrap();
        table
    }

    #[test]
    fn test_schema_roles() {
        let formatter = VolatilityFormatter::new();
        let schema = formatter.schema();

        assert_eq!(schema.single_column(InputType::Id).unwrap(), "id");
        assert_eq!(schema.single_column(InputType::Time).unwrap(), "time");
        assert_eq!(
            schema.single_column(InputType::Target).unwrap(),
            "rolling_volatility"
        );
        assert_eq!(schema.columns().len(), 10);
    }

    #[test]
    fn test_transform_before_calibration_is_error() {
        let formatter = VolatilityFormatter::new();
        let table = sample_table();

        assert!(matches!(
            formatter.transform_inputs(&table),
            Err(FormatterError::ScalersNotSet)
        ));
        assert!(matches!(
            formatter.format_predictions(&table),
            Err(FormatterError::ScalersNotSet)
        ));
    }

    #[test]
    fn test_pass_through_columns() {
        let mut formatter = VolatilityFormatter::new();
        let table = sample_table();
        formatter.set_scalers(&table).unwrap();

        let transformed = formatter.transform_inputs(&table).unwrap();
        for name in ["id", "time", "rolling_volatility"] {
            assert_eq!(transformed.column(name), table.column(name), "{}", name);
        }
    }

    #[test]
    fn test_real_columns_are_standardized() {
        let mut formatter = VolatilityFormatter::new();
        let table = sample_table();
        formatter.set_scalers(&table).unwrap();

        let transformed = formatter.transform_inputs(&table).unwrap();
        let values = transformed.numeric_column("SPREAD").unwrap();

        let mean: f64 = values.iter().sum::<f64>() / values.len() as f64;
        assert!(mean.abs() < 1e-10);
        // [1, 2, 3, 4] standardized by population stats
        let expected_std = (1.25f64).sqrt();
        assert!((values[0] - (1.0 - 2.5) / expected_std).abs() < 1e-10);
    }

    #[test]
    fn test_categorical_codes() {
        let mut formatter = VolatilityFormatter::new();
        let table = sample_table();
        formatter.set_scalers(&table).unwrap();

        let transformed = formatter.transform_inputs(&table).unwrap();
        assert_eq!(
            transformed.numeric_column("STOCK").unwrap(),
            &[0.0, 0.0, 1.0, 1.0]
        );
        assert_eq!(formatter.num_classes_per_cat_input().unwrap(), &[2]);
    }

    #[test]
    fn test_identifiers_first_seen_order() {
        let mut formatter = VolatilityFormatter::new();
        formatter.set_scalers(&sample_table()).unwrap();

        assert_eq!(
            formatter.identifiers().unwrap(),
            &["0".to_string(), "1".to_string()]
        );
    }

    #[test]
    fn test_format_predictions_reserved_columns() {
        let mut formatter = VolatilityFormatter::new();
        formatter.set_scalers(&sample_table()).unwrap();

        let mut predictions = DataTable::new();
        predictions
            .push_column("forecast_time", Column::Numeric(vec![100.0, 101.0]))
            .unwrap();
        predictions
            .push_column("identifier", text(&["AAPL", "MSFT"]))
            .unwrap();
        predictions
            .push_column("p50", Column::Numeric(vec![0.0, 1.0]))
            .unwrap();

        let formatted = formatter.format_predictions(&predictions).unwrap();

        assert_eq!(
            formatted.column("forecast_time"),
            predictions.column("forecast_time")
        );
        assert_eq!(formatted.column("identifier"), predictions.column("identifier"));

        // Training target was [0.1, 0.2, 0.3, 0.4]: mean 0.25, population
        // std sqrt(0.0125). A scaled 0.0 maps back to the mean.
        let restored = formatted.numeric_column("p50").unwrap();
        assert!((restored[0] - 0.25).abs() < 1e-10);
        assert!((restored[1] - (0.25 + 0.0125f64.sqrt())).abs() < 1e-10);
    }

    #[test]
    fn test_missing_partition_column() {
        let mut formatter = VolatilityFormatter::new();
        let table = sample_table();

        assert!(matches!(
            formatter.split_data(&table, 7.0, 8.0),
            Err(FormatterError::ConfigError(_))
        ));
    }

    #[test]
    fn test_recalibration_overwrites_state() {
        let mut formatter = VolatilityFormatter::new();
        let table = sample_table();
        formatter.set_scalers(&table).unwrap();
        let first = formatter.transform_inputs(&table).unwrap();

        // Same data again: state is rebuilt and output is unchanged
        formatter.set_scalers(&table).unwrap();
        let second = formatter.transform_inputs(&table).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fixed_and_model_params() {
        let formatter = VolatilityFormatter::new();

        let fixed = formatter.fixed_params(20);
        assert_eq!(fixed.total_time_steps, 120);
        assert_eq!(formatter.time_steps(), 120);
        assert_eq!(formatter.num_encoder_steps(), 100);

        let model = formatter.default_model_params();
        assert_eq!(model.hidden_layer_size, 160);
        assert_eq!(model.num_heads, 1);
    }
}
