//! Normalization and encoding primitives
//!
//! Scalers and encoders are calibrated once on training data and then
//! applied unchanged to every split.

pub mod encoder;
pub mod normalizer;

pub use encoder::LabelEncoder;
pub use normalizer::StandardScaler;
