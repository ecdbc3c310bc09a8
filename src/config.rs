//! Fixed experiment and model hyperparameters
//!
//! Both records are constant-producing configuration, consumed by the
//! external training layer.

use serde::{Deserialize, Serialize};

/// Lookback window length (encoder steps) for the volatility experiment
pub const NUM_ENCODER_STEPS: usize = 100;

/// Forecast horizon used when none is given
pub const DEFAULT_FORECAST_HORIZON: usize = 20;

/// Fixed experiment parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedParams {
    /// Total sequence length (lookback window plus forecast horizon)
    pub total_time_steps: usize,
    /// Lookback window length fed to the encoder
    pub num_encoder_steps: usize,
    /// Training epoch budget
    pub num_epochs: usize,
    /// Epochs without improvement before training stops
    pub early_stopping_patience: usize,
    /// Worker parallelism hint for the data pipeline
    pub multiprocessing_workers: usize,
}

impl FixedParams {
    /// Fixed parameters for a given forecast horizon
    pub fn for_horizon(forecast_horizon: usize) -> Self {
        Self {
            total_time_steps: NUM_ENCODER_STEPS + forecast_horizon,
            num_encoder_steps: NUM_ENCODER_STEPS,
            num_epochs: 100,
            early_stopping_patience: 5,
            multiprocessing_workers: 5,
        }
    }
}

impl Default for FixedParams {
    fn default() -> Self {
        Self::for_horizon(DEFAULT_FORECAST_HORIZON)
    }
}

/// Default optimised model hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Dropout rate
    pub dropout_rate: f64,
    /// Hidden layer width
    pub hidden_layer_size: usize,
    /// Learning rate
    pub learning_rate: f64,
    /// Minibatch size
    pub minibatch_size: usize,
    /// Gradient clipping norm
    pub max_gradient_norm: f64,
    /// Attention head count
    pub num_heads: usize,
    /// Stacked layer count
    pub stack_size: usize,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            dropout_rate: 0.3,
            hidden_layer_size: 160,
            learning_rate: 0.01,
            minibatch_size: 64,
            max_gradient_norm: 0.01,
            num_heads: 1,
            stack_size: 1,
        }
    }
}
