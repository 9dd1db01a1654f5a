use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use hp_core::{Error, InputRecord, Predictor, Result, Value};

use crate::estimator::Estimator;

/// Target-mean encoding for one categorical column, learned at fit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEncoder {
    /// Column this encoder applies to
    pub column: String,
    pub means: BTreeMap<String, f64>,
    /// Training-set global mean, used for codes never seen at fit time
    pub fallback: f64,
}

impl CategoryEncoder {
    pub fn encode(&self, code: &str) -> f64 {
        self.means.get(code).copied().unwrap_or(self.fallback)
    }
}

/// Per-feature standardization, fitted alongside the estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn transform(&self, features: &mut [f64]) -> Result<()> {
        if self.mean.len() != features.len() || self.scale.len() != features.len() {
            return Err(Error::Prediction(format!(
                "scaler was fitted on {} features, got {}",
                self.mean.len(),
                features.len()
            )));
        }
        for (i, x) in features.iter_mut().enumerate() {
            // constant training columns end up with scale 0
            let scale = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            *x = (*x - self.mean[i]) / scale;
        }
        Ok(())
    }
}

/// A fitted model exactly as the training pipeline serialized it: the
/// estimator plus the preprocessing it was fitted with. Nothing here is
/// derived at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedModel {
    /// Human-readable algorithm name, e.g. "Random Forest"
    pub algorithm: String,
    /// Column names, in the order the estimator expects its features
    pub features: Vec<String>,
    pub encoder: Option<CategoryEncoder>,
    pub scaler: Option<StandardScaler>,
    pub estimator: Estimator,
}

impl FittedModel {
    /// Resolve the feature vector from the record strictly by column name.
    /// A name the record does not carry is an error, never a default.
    fn feature_vector(&self, record: &InputRecord) -> Result<Vec<f64>> {
        let mut features = Vec::with_capacity(self.features.len());
        for column in &self.features {
            let value = record.get(column).ok_or_else(|| {
                Error::Prediction(format!(
                    "input record has no column '{}'; column names must match the training schema",
                    column
                ))
            })?;
            let x = match value {
                Value::Number(n) => *n,
                Value::Text(code) => match &self.encoder {
                    Some(encoder) if encoder.column == *column => encoder.encode(code),
                    _ => {
                        return Err(Error::Prediction(format!(
                            "column '{}' is categorical but the model carries no encoder for it",
                            column
                        )))
                    }
                },
            };
            features.push(x);
        }
        if let Some(scaler) = &self.scaler {
            scaler.transform(&mut features)?;
        }
        Ok(features)
    }
}

#[async_trait]
impl Predictor for FittedModel {
    fn name(&self) -> &str {
        &self.algorithm
    }

    async fn predict(&self, record: &InputRecord) -> Result<f64> {
        let features = self.feature_vector(record)?;
        let estimate = self.estimator.predict(&features)?;
        if !estimate.is_finite() {
            return Err(Error::Prediction(format!(
                "{} produced a non-finite estimate",
                self.algorithm
            )));
        }
        Ok(estimate)
    }
}
