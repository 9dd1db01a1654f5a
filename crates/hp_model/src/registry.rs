use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use hp_core::{Error, Predictor, Result};

use crate::artifact::Artifact;

/// The immutable name→predictor mapping. Loaded once at startup, shared
/// read-only for the process lifetime.
pub struct ModelRegistry {
    models: BTreeMap<String, Arc<dyn Predictor>>,
    default_name: String,
}

impl ModelRegistry {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let artifact = Artifact::load(path).await?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: Artifact) -> Result<Self> {
        let default_model = artifact.default_model;
        let mut models: BTreeMap<String, Arc<dyn Predictor>> = BTreeMap::new();
        for (name, model) in artifact.models {
            models.insert(name, Arc::new(model));
        }
        if !models.contains_key(&default_model) {
            // default selection is by explicit name; if the artifact points at
            // a model it does not contain, fall back deterministically
            let fallback = models
                .keys()
                .next()
                .cloned()
                .ok_or_else(|| Error::Artifact("artifact contains no models".to_string()))?;
            warn!(
                "default model '{}' is not in the artifact, falling back to '{}'",
                default_model, fallback
            );
            return Self::from_parts(models, fallback);
        }
        Self::from_parts(models, default_model)
    }

    /// Assemble a registry directly from predictor instances. The artifact
    /// loader is the normal entry point; this exists for embedding and tests.
    pub fn from_parts(
        models: BTreeMap<String, Arc<dyn Predictor>>,
        default_name: impl Into<String>,
    ) -> Result<Self> {
        let default_name = default_name.into();
        if models.is_empty() {
            return Err(Error::Artifact("registry has no models".to_string()));
        }
        if !models.contains_key(&default_name) {
            return Err(Error::UnknownModel(default_name));
        }
        info!(
            "🧠 Model registry ready: {} (default: {})",
            models.keys().cloned().collect::<Vec<_>>().join(", "),
            default_name
        );
        Ok(Self {
            models,
            default_name,
        })
    }

    /// Model names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Predictor>> {
        self.models
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownModel(name.to_string()))
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::{Estimator, RegressionTree, TreeNode};
    use crate::pipeline::FittedModel;
    use chrono::Utc;
    use hp_core::HouseInput;

    fn leaf_model(name: &str, value: f64) -> FittedModel {
        FittedModel {
            algorithm: name.to_string(),
            features: vec!["GrLivArea".to_string()],
            encoder: None,
            scaler: None,
            estimator: Estimator::DecisionTree {
                tree: RegressionTree {
                    nodes: vec![TreeNode::Leaf { value }],
                },
            },
        }
    }

    fn artifact_with(default_model: &str) -> Artifact {
        Artifact {
            version: crate::artifact::FORMAT_VERSION,
            trained_at: Utc::now(),
            default_model: default_model.to_string(),
            models: BTreeMap::from([
                ("Decision Tree".to_string(), leaf_model("Decision Tree", 120_000.0)),
                ("Random Forest".to_string(), leaf_model("Random Forest", 180_000.0)),
            ]),
        }
    }

    #[tokio::test]
    async fn default_resolves_by_explicit_name() {
        let registry = ModelRegistry::from_artifact(artifact_with("Random Forest")).unwrap();
        assert_eq!(registry.default_name(), "Random Forest");
        assert_eq!(registry.names(), vec!["Decision Tree", "Random Forest"]);
        assert!(registry.get(registry.default_name()).is_ok());
    }

    #[tokio::test]
    async fn absent_default_falls_back_to_first_sorted_name() {
        let registry = ModelRegistry::from_artifact(artifact_with("XGBoost")).unwrap();
        assert_eq!(registry.default_name(), "Decision Tree");
    }

    #[tokio::test]
    async fn unknown_lookups_are_errors() {
        let registry = ModelRegistry::from_artifact(artifact_with("Random Forest")).unwrap();
        match registry.get("CatBoost") {
            Err(Error::UnknownModel(name)) => assert_eq!(name, "CatBoost"),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn models_predict_independently() {
        let registry = ModelRegistry::from_artifact(artifact_with("Random Forest")).unwrap();
        let record = HouseInput::default().to_record();

        let tree = registry.get("Decision Tree").unwrap();
        let forest = registry.get("Random Forest").unwrap();
        let a = tree.predict(&record).await.unwrap();
        let b = forest.predict(&record).await.unwrap();
        assert_eq!(a, 120_000.0);
        assert_eq!(b, 180_000.0);
        assert_ne!(a, b);
    }
}
