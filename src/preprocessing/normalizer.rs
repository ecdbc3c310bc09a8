//! Z-score normalization over feature matrices

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{FormatterError, Result};

/// Per-column standard scaler.
///
/// Fitting computes a mean and population standard deviation for every
/// column of the training matrix; transforming maps each value to
/// `(x - mean) / std` with the stored statistics. Columns with
/// near-zero spread scale by 1.0 so constant features survive the
/// round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    /// Fits a scaler on a (rows x columns) training matrix
    pub fn fit(data: &Array2<f64>) -> Result<Self> {
        if data.nrows() == 0 {
            return Err(FormatterError::ConfigError(
                "cannot fit scaler on an empty matrix".to_string(),
            ));
        }

        let mean = data.mean_axis(Axis(0)).ok_or_else(|| {
            FormatterError::ConfigError("cannot fit scaler on a zero-width matrix".to_string())
        })?;
        let std = data.std_axis(Axis(0), 0.0);

        Ok(Self {
            mean: mean.to_vec(),
            std: std.iter().map(|&s| if s > 1e-10 { s } else { 1.0 }).collect(),
        })
    }

    /// Number of columns the scaler was fitted on
    pub fn num_features(&self) -> usize {
        self.mean.len()
    }

    /// Fitted per-column means
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Fitted per-column standard deviations (zero spread guarded to 1.0)
    pub fn std(&self) -> &[f64] {
        &self.std
    }

    /// Scales a matrix with the fitted statistics
    pub fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(data.ncols())?;

        let mut result = data.clone();
        for (j, mut column) in result.columns_mut().into_iter().enumerate() {
            let (mean, std) = (self.mean[j], self.std[j]);
            column.mapv_inplace(|x| (x - mean) / std);
        }
        Ok(result)
    }

    /// Reverses scaling on a matrix
    pub fn inverse_transform(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(data.ncols())?;

        let mut result = data.clone();
        for (j, mut column) in result.columns_mut().into_iter().enumerate() {
            let (mean, std) = (self.mean[j], self.std[j]);
            column.mapv_inplace(|x| x * std + mean);
        }
        Ok(result)
    }

    /// Scales a single column's values with the statistics fitted at
    /// the given column position
    pub fn transform_column(&self, index: usize, values: &[f64]) -> Result<Vec<f64>> {
        let (mean, std) = self.column_stats(index)?;
        Ok(values.iter().map(|&x| (x - mean) / std).collect())
    }

    /// Reverses scaling on a single column's values
    pub fn inverse_transform_column(&self, index: usize, values: &[f64]) -> Result<Vec<f64>> {
        let (mean, std) = self.column_stats(index)?;
        Ok(values.iter().map(|&x| x * std + mean).collect())
    }

    fn column_stats(&self, index: usize) -> Result<(f64, f64)> {
        if index >= self.num_features() {
            return Err(FormatterError::ConfigError(format!(
                "scaler column index {} out of range ({} fitted)",
                index,
                self.num_features()
            )));
        }
        Ok((self.mean[index], self.std[index]))
    }

    fn check_width(&self, ncols: usize) -> Result<()> {
        if ncols != self.num_features() {
            return Err(FormatterError::ShapeMismatch {
                expected: self.num_features(),
                got: ncols,
            });
        }
        Ok(())
    }
}
