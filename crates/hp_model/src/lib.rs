pub mod artifact;
pub mod estimator;
pub mod pipeline;
pub mod registry;

pub use artifact::{Artifact, DEFAULT_ARTIFACT};
pub use pipeline::FittedModel;
pub use registry::ModelRegistry;

pub mod prelude {
    pub use super::{Artifact, FittedModel, ModelRegistry};
    pub use hp_core::{Error, HouseInput, InputRecord, Predictor, Result};
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::registry::ModelRegistry;
    use hp_core::{HouseInput, Predictor};

    #[tokio::test]
    async fn end_to_end_artifact_roundtrip() {
        use crate::artifact::{Artifact, FORMAT_VERSION};
        use crate::estimator::{Estimator, RegressionTree, TreeNode};
        use crate::pipeline::FittedModel;
        use std::collections::BTreeMap;
        use std::io::Write;

        let artifact = Artifact {
            version: FORMAT_VERSION,
            trained_at: chrono::Utc::now(),
            default_model: "Gradient Boosting".to_string(),
            models: BTreeMap::from([(
                "Gradient Boosting".to_string(),
                FittedModel {
                    algorithm: "Gradient Boosting".to_string(),
                    features: vec!["GrLivArea".to_string(), "OverallQual".to_string()],
                    encoder: None,
                    scaler: None,
                    estimator: Estimator::GradientBoosting {
                        base_score: 150_000.0,
                        learning_rate: 0.1,
                        trees: vec![RegressionTree {
                            nodes: vec![
                                TreeNode::Split {
                                    feature: 1,
                                    threshold: 5.0,
                                    left: 1,
                                    right: 2,
                                },
                                TreeNode::Leaf { value: -20_000.0 },
                                TreeNode::Leaf { value: 40_000.0 },
                            ],
                        }],
                    },
                },
            )]),
        };

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&artifact).unwrap().as_bytes())
            .unwrap();

        let registry = ModelRegistry::load(file.path()).await.unwrap();
        let predictor: Arc<dyn Predictor> = registry.get(registry.default_name()).unwrap();

        // default input has OverallQual 5, which goes down the left branch
        let estimate = predictor
            .predict(&HouseInput::default().to_record())
            .await
            .unwrap();
        assert_eq!(estimate, 150_000.0 + 0.1 * -20_000.0);
    }
}
