//! Tunables for a single outlook request.

use bon::Builder;
use serde::Deserialize;

/// Settings for training the ensemble and projecting it forward.
///
/// Every field has a default, so `OutlookConfig::default()` reproduces the stock
/// behaviour: a 150-tree forest seeded with 42, a 5-day horizon, and no model at all
/// below 10 training examples.
///
/// Build a custom configuration with the generated builder:
///
/// ```
/// use climate_outlook::OutlookConfig;
///
/// let config = OutlookConfig::builder().horizon_days(7).n_trees(50).build();
/// assert_eq!(config.horizon_days, 7);
/// assert_eq!(config.seed, 42);
/// ```
///
/// A hosting service can also deserialize it from its own config file; missing keys
/// fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Builder, Deserialize)]
#[serde(default)]
pub struct OutlookConfig {
    /// Number of days projected after the reference date.
    #[builder(default = 5)]
    pub horizon_days: u32,
    /// Trees in the regression ensemble.
    #[builder(default = 150)]
    pub n_trees: usize,
    /// Seed for bootstrap sampling. Identical inputs and seed give identical models.
    #[builder(default = 42)]
    pub seed: u64,
    /// Minimum usable training examples before a model is trained at all.
    #[builder(default = 10)]
    pub min_training_examples: usize,
    /// A node with fewer rows than this becomes a leaf.
    #[builder(default = 2)]
    pub min_samples_split: usize,
    /// Maximum tree depth; `None` grows trees until leaves are pure.
    pub max_depth: Option<usize>,
}

impl Default for OutlookConfig {
    fn default() -> Self {
        OutlookConfig::builder().build()
    }
}
