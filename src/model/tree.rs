//! A CART regression tree grown on a bootstrap sample.

use crate::types::feature_vector::FEATURE_COUNT;
use ordered_float::OrderedFloat;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub min_samples_split: usize,
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Candidate split of a node, found by a squared-error sweep over sorted values.
struct Split {
    feature: usize,
    threshold: f64,
    /// Sum of squared errors removed by the split.
    gain: f64,
}

#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    /// Unnormalized squared-error decrease attributed to each feature.
    importances: [f64; FEATURE_COUNT],
}

impl RegressionTree {
    /// Grows a tree over `sample`, a list of row indices that may contain repeats.
    ///
    /// Every feature is considered at every node. Nodes become leaves when they hold
    /// fewer than `min_samples_split` rows, reach `max_depth`, are pure, or have no
    /// feature with two distinct values.
    pub(crate) fn fit(
        rows: &[[f64; FEATURE_COUNT]],
        targets: &[f64],
        mut sample: Vec<usize>,
        params: TreeParams,
    ) -> Self {
        let mut builder = TreeBuilder {
            rows,
            targets,
            params,
            nodes: Vec::new(),
            importances: [0.0; FEATURE_COUNT],
        };
        builder.grow(&mut sample, 0);
        RegressionTree {
            nodes: builder.nodes,
            importances: builder.importances,
        }
    }

    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[feature] <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn importances(&self) -> &[f64; FEATURE_COUNT] {
        &self.importances
    }
}

struct TreeBuilder<'a> {
    rows: &'a [[f64; FEATURE_COUNT]],
    targets: &'a [f64],
    params: TreeParams,
    nodes: Vec<Node>,
    importances: [f64; FEATURE_COUNT],
}

impl TreeBuilder<'_> {
    /// Grows the subtree for `sample` and returns the index of its root node.
    fn grow(&mut self, sample: &mut [usize], depth: usize) -> usize {
        let n = sample.len() as f64;
        let sum: f64 = sample.iter().map(|&i| self.targets[i]).sum();
        let sum_sq: f64 = sample.iter().map(|&i| self.targets[i].powi(2)).sum();
        let node_id = self.nodes.len();
        self.nodes.push(Node::Leaf { value: sum / n });

        // equal targets still leave summation noise in parent_sse
        let parent_sse = sum_sq - sum * sum / n;
        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        if sample.len() < self.params.min_samples_split
            || depth_reached
            || parent_sse <= f64::EPSILON * n * sum_sq.max(1.0)
        {
            return node_id;
        }

        let Some(split) = self.best_split(sample, sum, parent_sse) else {
            return node_id;
        };

        let mut mid = 0;
        for j in 0..sample.len() {
            if self.rows[sample[j]][split.feature] <= split.threshold {
                sample.swap(mid, j);
                mid += 1;
            }
        }
        // non-finite thresholds can fail to separate anything
        if mid == 0 || mid == sample.len() {
            return node_id;
        }

        let (left_sample, right_sample) = sample.split_at_mut(mid);
        let left = self.grow(left_sample, depth + 1);
        let right = self.grow(right_sample, depth + 1);
        self.importances[split.feature] += split.gain;
        self.nodes[node_id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_id
    }

    /// Finds the split maximizing `left_sum²/left_n + right_sum²/right_n`, which is
    /// the same as minimizing the children's summed squared error.
    fn best_split(&self, sample: &[usize], total_sum: f64, parent_sse: f64) -> Option<Split> {
        let n = sample.len();
        let total_sq: f64 = sample.iter().map(|&i| self.targets[i].powi(2)).sum();
        let mut best: Option<(Split, f64)> = None;
        let mut order = sample.to_vec();

        for feature in 0..FEATURE_COUNT {
            order.sort_by_key(|&i| OrderedFloat(self.rows[i][feature]));

            let mut left_sum = 0.0;
            for k in 0..n - 1 {
                left_sum += self.targets[order[k]];
                let current = self.rows[order[k]][feature];
                let next = self.rows[order[k + 1]][feature];
                if current == next {
                    continue;
                }

                let left_n = (k + 1) as f64;
                let right_n = (n - k - 1) as f64;
                let right_sum = total_sum - left_sum;
                let proxy = left_sum * left_sum / left_n + right_sum * right_sum / right_n;
                if best.as_ref().is_some_and(|(_, p)| proxy <= *p) {
                    continue;
                }

                let mut threshold = current / 2.0 + next / 2.0;
                if threshold == next || threshold.is_nan() {
                    threshold = current;
                }
                let child_sse = total_sq - proxy;
                best = Some((
                    Split {
                        feature,
                        threshold,
                        gain: (parent_sse - child_sse).max(0.0),
                    },
                    proxy,
                ));
            }
        }
        best.map(|(split, _)| split)
    }
}
