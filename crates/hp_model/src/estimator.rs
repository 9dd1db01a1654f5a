use serde::{Deserialize, Serialize};

use hp_core::{Error, Result};

/// One node of a fitted regression tree, stored as a flat array. Split nodes
/// follow the scikit-learn convention: `x <= threshold` goes left.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Walk from the root to a leaf. The walk is bounded by the node count
    /// so a malformed artifact cannot loop forever.
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        let mut index = 0usize;
        for _ in 0..=self.nodes.len() {
            let node = self.nodes.get(index).ok_or_else(|| {
                Error::Prediction(format!("tree references missing node {}", index))
            })?;
            match node {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = features.get(*feature).copied().ok_or_else(|| {
                        Error::Prediction(format!(
                            "tree splits on feature {} but the record provides {}",
                            feature,
                            features.len()
                        ))
                    })?;
                    index = if x <= *threshold { *left } else { *right };
                }
            }
        }
        Err(Error::Prediction(
            "tree walk did not reach a leaf".to_string(),
        ))
    }
}

/// The fitted estimators the training pipeline serializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    LinearRegression {
        weights: Vec<f64>,
        intercept: f64,
    },
    DecisionTree {
        tree: RegressionTree,
    },
    /// Averages its trees
    RandomForest {
        trees: Vec<RegressionTree>,
    },
    /// Shrunken sum of tree corrections over a base score
    GradientBoosting {
        base_score: f64,
        learning_rate: f64,
        trees: Vec<RegressionTree>,
    },
}

impl Estimator {
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        match self {
            Estimator::LinearRegression { weights, intercept } => {
                if weights.len() != features.len() {
                    return Err(Error::Prediction(format!(
                        "linear model was fitted on {} features, got {}",
                        weights.len(),
                        features.len()
                    )));
                }
                let dot: f64 = weights.iter().zip(features).map(|(w, x)| w * x).sum();
                Ok(dot + intercept)
            }
            Estimator::DecisionTree { tree } => tree.predict(features),
            Estimator::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(Error::Prediction("random forest has no trees".to_string()));
                }
                let mut sum = 0.0;
                for tree in trees {
                    sum += tree.predict(features)?;
                }
                Ok(sum / trees.len() as f64)
            }
            Estimator::GradientBoosting {
                base_score,
                learning_rate,
                trees,
            } => {
                let mut estimate = *base_score;
                for tree in trees {
                    estimate += learning_rate * tree.predict(features)?;
                }
                Ok(estimate)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> RegressionTree {
        RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: low },
                TreeNode::Leaf { value: high },
            ],
        }
    }

    #[test]
    fn linear_regression_is_a_dot_product() {
        let model = Estimator::LinearRegression {
            weights: vec![2.0, -1.0, 0.5],
            intercept: 10.0,
        };
        let estimate = model.predict(&[3.0, 4.0, 2.0]).unwrap();
        assert_eq!(estimate, 2.0 * 3.0 - 4.0 + 0.5 * 2.0 + 10.0);

        assert!(model.predict(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn tree_walk_follows_thresholds() {
        let tree = stump(0, 1000.0, 100_000.0, 200_000.0);
        assert_eq!(tree.predict(&[900.0]).unwrap(), 100_000.0);
        assert_eq!(tree.predict(&[1000.0]).unwrap(), 100_000.0);
        assert_eq!(tree.predict(&[1001.0]).unwrap(), 200_000.0);
    }

    #[test]
    fn malformed_trees_error_instead_of_hanging() {
        // child index points past the node array
        let broken = RegressionTree {
            nodes: vec![TreeNode::Split {
                feature: 0,
                threshold: 1.0,
                left: 5,
                right: 6,
            }],
        };
        assert!(broken.predict(&[0.0]).is_err());

        // split node that cycles back to itself
        let cyclic = RegressionTree {
            nodes: vec![TreeNode::Split {
                feature: 0,
                threshold: 1.0,
                left: 0,
                right: 0,
            }],
        };
        assert!(cyclic.predict(&[0.0]).is_err());

        // split on a feature the record does not carry
        let tree = stump(7, 1.0, 0.0, 1.0);
        assert!(tree.predict(&[0.0]).is_err());
    }

    #[test]
    fn forest_averages_and_boosting_accumulates() {
        let forest = Estimator::RandomForest {
            trees: vec![
                stump(0, 5.0, 100.0, 300.0),
                stump(0, 5.0, 200.0, 400.0),
            ],
        };
        assert_eq!(forest.predict(&[1.0]).unwrap(), 150.0);
        assert_eq!(forest.predict(&[9.0]).unwrap(), 350.0);

        let boosted = Estimator::GradientBoosting {
            base_score: 100.0,
            learning_rate: 0.5,
            trees: vec![stump(0, 5.0, 10.0, 20.0), stump(0, 5.0, 30.0, 40.0)],
        };
        assert_eq!(boosted.predict(&[1.0]).unwrap(), 100.0 + 0.5 * (10.0 + 30.0));

        let empty = Estimator::RandomForest { trees: vec![] };
        assert!(empty.predict(&[1.0]).is_err());
    }
}
