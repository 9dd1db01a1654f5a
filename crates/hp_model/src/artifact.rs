use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use hp_core::{Error, Result};

use crate::pipeline::FittedModel;

pub const FORMAT_VERSION: u32 = 1;

/// Default artifact filename, relative to the working directory.
pub const DEFAULT_ARTIFACT: &str = "models.json";

/// The serialized output of the training pipeline: a versioned mapping of
/// model name to fitted model, plus which one the form should preselect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub version: u32,
    pub trained_at: DateTime<Utc>,
    pub default_model: String,
    pub models: BTreeMap<String, FittedModel>,
}

impl Artifact {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ArtifactMissing(path.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let artifact: Artifact = serde_json::from_slice(&bytes)?;
        if artifact.version != FORMAT_VERSION {
            return Err(Error::Artifact(format!(
                "unsupported artifact version {} (expected {})",
                artifact.version, FORMAT_VERSION
            )));
        }
        if artifact.models.is_empty() {
            return Err(Error::Artifact("artifact contains no models".to_string()));
        }
        info!(
            "📦 Loaded {} fitted models from {} (trained {})",
            artifact.models.len(),
            path.display(),
            artifact.trained_at
        );
        Ok(artifact)
    }
}
