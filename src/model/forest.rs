use crate::config::OutlookConfig;
use crate::error::{OutlookError, Stage};
use crate::model::tree::{RegressionTree, TreeParams};
use crate::model::OneStepModel;
use crate::types::feature_vector::{FeatureVector, FEATURE_COUNT};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A bagged ensemble of regression trees predicting the next day's maximum.
///
/// Each tree is grown on a bootstrap sample (n rows drawn with replacement) from a
/// single seeded generator, so the same inputs and [`OutlookConfig`] always produce
/// the same forest.
#[derive(Debug, Clone)]
pub struct ForestRegressor {
    trees: Vec<RegressionTree>,
}

impl ForestRegressor {
    /// Fits `config.n_trees` trees on the rows of `features` against `targets`.
    ///
    /// # Errors
    ///
    /// Returns [`OutlookError::Training`] if the inputs are empty, their lengths
    /// differ, a target is not finite, or the configuration asks for zero trees.
    pub fn fit(
        features: &[[f64; FEATURE_COUNT]],
        targets: &[f64],
        config: &OutlookConfig,
    ) -> Result<Self, OutlookError> {
        let reject = |reason: String| OutlookError::Training {
            stage: Stage::Training,
            reason,
        };
        if features.is_empty() {
            return Err(reject("empty feature matrix".to_string()));
        }
        if features.len() != targets.len() {
            return Err(reject(format!(
                "{} feature rows but {} targets",
                features.len(),
                targets.len()
            )));
        }
        if let Some(pos) = targets.iter().position(|t| !t.is_finite()) {
            return Err(reject(format!("target {} is not finite", pos)));
        }
        if config.n_trees == 0 {
            return Err(reject("ensemble needs at least one tree".to_string()));
        }

        let params = TreeParams {
            min_samples_split: config.min_samples_split.max(2),
            max_depth: config.max_depth,
        };
        let n = features.len();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let trees: Vec<RegressionTree> = (0..config.n_trees)
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::fit(features, targets, sample, params)
            })
            .collect();

        debug!(
            "Fitted {} trees on {} examples ({} nodes in total)",
            trees.len(),
            n,
            trees.iter().map(RegressionTree::node_count).sum::<usize>()
        );
        Ok(ForestRegressor { trees })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean decrease in squared error per feature, in feature-slot order.
    ///
    /// Each tree's importances are normalized before averaging; the result sums to 1
    /// unless no tree made a single split, in which case it is all zeros.
    pub fn feature_importances(&self) -> [f64; FEATURE_COUNT] {
        let mut total = [0.0; FEATURE_COUNT];
        for tree in &self.trees {
            let tree_sum: f64 = tree.importances().iter().sum();
            if tree_sum > 0.0 {
                for (acc, value) in total.iter_mut().zip(tree.importances()) {
                    *acc += value / tree_sum;
                }
            }
        }
        let sum: f64 = total.iter().sum();
        if sum > 0.0 {
            total.iter_mut().for_each(|v| *v /= sum);
        }
        total
    }

    /// Coefficient of determination of the forest on the given rows.
    ///
    /// `None` when there are no rows or the targets do not vary beyond floating-point
    /// rounding.
    pub fn r2_score(&self, features: &[[f64; FEATURE_COUNT]], targets: &[f64]) -> Option<f64> {
        if features.is_empty() || features.len() != targets.len() {
            return None;
        }
        let n = targets.len() as f64;
        let mean = targets.iter().sum::<f64>() / n;
        let ss_tot: f64 = targets.iter().map(|t| (t - mean).powi(2)).sum();
        // constant targets leave only rounding noise in ss_tot
        if ss_tot <= f64::EPSILON * n * mean.powi(2).max(1.0) {
            return None;
        }
        let ss_res: f64 = features
            .iter()
            .zip(targets)
            .map(|(row, t)| (t - self.predict_row(row)).powi(2))
            .sum();
        Some(1.0 - ss_res / ss_tot)
    }

    fn predict_row(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        let sum: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        sum / self.trees.len() as f64
    }
}

impl OneStepModel for ForestRegressor {
    fn predict(&self, features: &FeatureVector) -> f64 {
        self.predict_row(features.values())
    }
}
