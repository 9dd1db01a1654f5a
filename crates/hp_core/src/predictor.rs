use async_trait::async_trait;

use crate::types::InputRecord;
use crate::Result;

#[async_trait]
pub trait Predictor: Send + Sync {
    /// Name of the algorithm behind this predictor
    fn name(&self) -> &str;

    /// Estimate the sale price for a single input record
    async fn predict(&self, record: &InputRecord) -> Result<f64>;
}
