use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub mod error;
pub mod handlers;
pub mod page;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/models", get(handlers::list_models))
        .route("/api/schema", get(handlers::schema))
        .route("/api/predict", post(handlers::predict))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::AppState;
    pub use hp_core::{Error, HouseInput, Result};
    pub use hp_model::ModelRegistry;
}
