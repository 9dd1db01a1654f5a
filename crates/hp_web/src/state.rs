use std::sync::Arc;

use hp_model::ModelRegistry;

pub struct AppState {
    pub registry: Arc<ModelRegistry>,
}
