//! The one-step regression model behind the outlook.

pub mod forest;
pub mod tree;

use crate::types::feature_vector::FeatureVector;

/// Anything that can estimate tomorrow's maximum temperature from today's features.
pub trait OneStepModel {
    fn predict(&self, features: &FeatureVector) -> f64;
}
