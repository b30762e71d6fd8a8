//! Feature Engineering Engine
//!
//! Time-domain statistical features and Welch power-spectral-density
//! features for vibration signals, selected by case-insensitive name.

mod error;
mod features;
mod spectral;
mod statistics;

pub use error::FeatureError;
pub use features::{compute_time_features, FeatureExtractor, FeatureKind, FeatureMap, FeatureValue};
pub use spectral::{
    compute_spectral_features, wants_spectral, Psd, SpectralFeatures, WelchEstimator,
    DEFAULT_BLADE_COUNT,
};
pub use statistics::StatisticalFeatures;
